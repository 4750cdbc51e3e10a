//! 类型化集合测试
//!
//! 覆盖元素类型不变量、批量操作的整体校验和切片类型保持

use std::sync::Arc;

use rat_domain::error::DomainError;
use rat_domain::model::{
    ModelCollection, ModelInstance, ModelSchema, collection_field, integer_field,
};
use rat_domain::types::DataValue;
use rat_domain::model_data;

fn credit_schema() -> Arc<ModelSchema> {
    ModelSchema::builder("Credit")
        .field("amount", integer_field())
        .build()
        .unwrap()
}

fn credit(schema: &Arc<ModelSchema>, amount: i64) -> ModelInstance {
    schema.create(model_data! { amount: amount }).unwrap()
}

#[test]
fn test_init_empty() {
    let schema = credit_schema();
    let collection = schema.empty_collection();

    assert!(collection.is_empty());
    assert_eq!(collection.element_name(), "Credit");
}

#[test]
fn test_init_with_correct_values() {
    let schema = credit_schema();
    let collection = schema
        .collection(vec![
            credit(&schema, 1),
            credit(&schema, 2),
            credit(&schema, 3),
        ])
        .unwrap();

    assert_eq!(collection.len(), 3);
    assert_eq!(
        collection.get(0).unwrap().get("amount", None).unwrap(),
        DataValue::Int(1)
    );
}

#[test]
fn test_init_with_incorrect_values() {
    let schema = credit_schema();
    let other = ModelSchema::builder("Other")
        .field("amount", integer_field())
        .build()
        .unwrap();

    // 任一元素类型不符则构造失败，不产生集合
    let result = schema.collection(vec![credit(&schema, 1), credit(&other, 2)]);
    assert!(matches!(result, Err(DomainError::TypeError { .. })));
}

#[test]
fn test_append() {
    let schema = credit_schema();
    let collection = schema.empty_collection();

    collection.append(credit(&schema, 1)).unwrap();
    assert_eq!(collection.len(), 1);

    let other = ModelSchema::builder("Other").build().unwrap();
    let result = collection.append(other.create_empty().unwrap());
    assert!(matches!(result, Err(DomainError::TypeError { .. })));
    assert_eq!(collection.len(), 1);
}

#[test]
fn test_extend_is_all_or_nothing() {
    let schema = credit_schema();
    let other = ModelSchema::builder("Other").build().unwrap();
    let collection = schema.collection(vec![credit(&schema, 1)]).unwrap();

    collection
        .extend(vec![credit(&schema, 2), credit(&schema, 3)])
        .unwrap();
    assert_eq!(collection.len(), 3);

    // 批量操作整体校验，失败时不产生部分变更
    let result = collection.extend(vec![credit(&schema, 4), other.create_empty().unwrap()]);
    assert!(matches!(result, Err(DomainError::TypeError { .. })));
    assert_eq!(collection.len(), 3);
}

#[test]
fn test_insert() {
    let schema = credit_schema();
    let collection = schema.collection(vec![credit(&schema, 2)]).unwrap();

    collection.insert(0, credit(&schema, 1)).unwrap();
    assert_eq!(
        collection.get(0).unwrap().get("amount", None).unwrap(),
        DataValue::Int(1)
    );

    let other = ModelSchema::builder("Other").build().unwrap();
    let result = collection.insert(0, other.create_empty().unwrap());
    assert!(matches!(result, Err(DomainError::TypeError { .. })));
    assert_eq!(collection.len(), 2);
}

#[test]
fn test_set_by_index() {
    let schema = credit_schema();
    let collection = schema.collection(vec![credit(&schema, 0)]).unwrap();

    collection.set(0, credit(&schema, 1)).unwrap();
    assert_eq!(
        collection.get(0).unwrap().get("amount", None).unwrap(),
        DataValue::Int(1)
    );

    let other = ModelSchema::builder("Other").build().unwrap();
    let result = collection.set(0, other.create_empty().unwrap());
    assert!(matches!(result, Err(DomainError::TypeError { .. })));

    // 越界索引报值错误
    let result = collection.set(5, credit(&schema, 9));
    assert!(matches!(result, Err(DomainError::ValueError { .. })));
}

#[test]
fn test_set_slice() {
    let schema = credit_schema();
    let collection = schema
        .collection(vec![
            credit(&schema, 1),
            credit(&schema, 2),
            credit(&schema, 3),
        ])
        .unwrap();

    collection
        .set_slice(0..3, vec![credit(&schema, 7), credit(&schema, 7), credit(&schema, 7)])
        .unwrap();
    assert_eq!(collection.len(), 3);
    assert_eq!(
        collection.get(2).unwrap().get("amount", None).unwrap(),
        DataValue::Int(7)
    );
}

#[test]
fn test_set_invalid_slice_leaves_collection_unmodified() {
    let schema = credit_schema();
    let other = ModelSchema::builder("Other").build().unwrap();
    let collection = schema
        .collection(vec![
            credit(&schema, 1),
            credit(&schema, 2),
            credit(&schema, 3),
        ])
        .unwrap();

    let result = collection.set_slice(
        0..3,
        vec![
            credit(&schema, 7),
            other.create_empty().unwrap(),
            credit(&schema, 7),
        ],
    );
    assert!(matches!(result, Err(DomainError::TypeError { .. })));

    let amounts: Vec<DataValue> = collection
        .items()
        .iter()
        .map(|c| c.get("amount", None).unwrap())
        .collect();
    assert_eq!(
        amounts,
        vec![DataValue::Int(1), DataValue::Int(2), DataValue::Int(3)]
    );
}

#[test]
fn test_slice_replacement_may_change_length() {
    let schema = credit_schema();
    let collection = schema
        .collection(vec![credit(&schema, 1), credit(&schema, 2)])
        .unwrap();

    collection.set_slice(1..2, vec![credit(&schema, 8), credit(&schema, 9)]).unwrap();
    assert_eq!(collection.len(), 3);
}

#[test]
fn test_get_slice_preserves_collection_type() {
    let schema = credit_schema();
    let collection = schema
        .collection(vec![
            credit(&schema, 1),
            credit(&schema, 2),
            credit(&schema, 3),
        ])
        .unwrap();

    let head = collection.slice(0..2).unwrap();
    assert_eq!(head.len(), 2);
    assert!(Arc::ptr_eq(head.schema(), collection.schema()));

    // 链式切片仍是类型化集合
    let nested = head.slice(0..1).unwrap();
    assert_eq!(nested.len(), 1);
    assert!(Arc::ptr_eq(nested.schema(), collection.schema()));

    let result = collection.slice(0..9);
    assert!(matches!(result, Err(DomainError::ValueError { .. })));
}

#[test]
fn test_accepts_element() {
    let schema = credit_schema();
    let other = ModelSchema::builder("Other").build().unwrap();
    let collection = schema.empty_collection();

    assert!(collection.accepts(&DataValue::Model(credit(&schema, 1))));
    assert!(!collection.accepts(&DataValue::Model(other.create_empty().unwrap())));
    assert!(!collection.accepts(&DataValue::Int(1)));

    assert!(schema.accepts_element(&DataValue::Model(credit(&schema, 1))));
    assert!(!schema.accepts_element(&DataValue::Null));
}

#[test]
fn test_collection_equality_is_element_wise() {
    let schema = ModelSchema::builder("Credit")
        .field("amount", integer_field())
        .unique_key(&["amount"])
        .build()
        .unwrap();

    let left = schema
        .collection(vec![credit(&schema, 1), credit(&schema, 2)])
        .unwrap();
    let right = schema
        .collection(vec![credit(&schema, 1), credit(&schema, 2)])
        .unwrap();

    assert_eq!(left, right);

    right.append(credit(&schema, 3)).unwrap();
    assert_ne!(left, right);
}

#[test]
fn test_collection_field_shares_handle() {
    let photo = ModelSchema::builder("Photo")
        .field("id", integer_field())
        .build()
        .unwrap();
    let profile_cls = ModelSchema::builder("Profile")
        .field("photos", collection_field(photo.clone()))
        .build()
        .unwrap();

    let photos = photo.empty_collection();
    let profile = profile_cls.create_empty().unwrap();
    profile.set("photos", photos.clone()).unwrap();

    // 字段存储与调用方共享同一集合句柄
    photos.append(photo.create_empty().unwrap()).unwrap();
    match profile.get("photos", None).unwrap() {
        DataValue::Collection(stored) => assert_eq!(stored.len(), 1),
        other => panic!("期望集合引用，收到 {:?}", other),
    }
}

#[test]
fn test_collection_from_foreign_collection_is_revalidated() {
    let schema = credit_schema();
    let same_shape = ModelSchema::builder("Credit")
        .field("amount", integer_field())
        .build()
        .unwrap();

    let profile_cls = ModelSchema::builder("Ledger")
        .field("credits", collection_field(schema.clone()))
        .build()
        .unwrap();
    let ledger = profile_cls.create_empty().unwrap();

    // 结构相同但类型不同的集合按元素重新校验后拒绝
    let foreign = same_shape
        .collection(vec![same_shape.create(model_data! { amount: 1 }).unwrap()])
        .unwrap();
    let result = ledger.set("credits", foreign);
    assert!(matches!(result, Err(DomainError::TypeError { .. })));

    // 元素类型正确的序列被装配为新集合
    ledger
        .set(
            "credits",
            DataValue::Array(vec![DataValue::Model(credit(&schema, 1))]),
        )
        .unwrap();
    match ledger.get("credits", None).unwrap() {
        DataValue::Collection(stored) => assert!(Arc::ptr_eq(stored.schema(), &schema)),
        other => panic!("期望集合引用，收到 {:?}", other),
    }
}

#[test]
fn test_to_data() {
    let schema = credit_schema();
    let collection = schema
        .collection(vec![credit(&schema, 1), credit(&schema, 2)])
        .unwrap();

    let data = collection.to_data();
    assert_eq!(
        data,
        vec![
            DataValue::Object(model_data! { amount: 1 }),
            DataValue::Object(model_data! { amount: 2 }),
        ]
    );

    // 独立构造等价集合
    let rebuilt = ModelCollection::from_instances(
        schema.clone(),
        vec![credit(&schema, 1), credit(&schema, 2)],
    )
    .unwrap();
    assert_eq!(rebuilt.to_data(), data);
}
