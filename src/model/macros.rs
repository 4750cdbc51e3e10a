//! 模型相关的宏定义
//!
//! 提供便捷的宏来声明模型和构造字段数据

/// 便捷宏：声明模型
///
/// 展开为单元结构体，`schema()` 首次调用时构建模型结构并
/// 自动注册到全局管理器，声明错误在此处直接panic（声明期错误
/// 不应推迟到使用期）。
///
/// # 示例
///
/// ```ignore
/// define_model! {
///     /// 照片模型
///     model Photo {
///         id: integer_field().required(),
///         storage_path: string_field(),
///     }
///     unique_key = [id],
/// }
///
/// let photo = Photo::create(model_data! { id: 1, storage_path: "a.jpg" })?;
/// ```
#[macro_export]
macro_rules! define_model {
    (
        $(#[$meta:meta])*
        model $name:ident {
            $(
                $field:ident : $field_def:expr,
            )*
        }
        $( unique_key = [ $($uk:ident),* $(,)? ], )?
        $( view_key = [ $($vk:ident),* $(,)? ], )?
    ) => {
        $(#[$meta])*
        pub struct $name;

        impl $name {
            /// 获取模型结构（首次调用时构建并注册）
            pub fn schema() -> ::std::sync::Arc<$crate::model::ModelSchema> {
                static SCHEMA: ::std::sync::OnceLock<
                    ::std::sync::Arc<$crate::model::ModelSchema>,
                > = ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        let builder = $crate::model::ModelSchema::builder(stringify!($name))
                            $( .field(stringify!($field), $field_def) )*
                            $( .unique_key(&[ $( stringify!($uk) ),* ]) )?
                            $( .view_key(&[ $( stringify!($vk) ),* ]) )?;

                        let schema = match builder.build() {
                            Ok(schema) => schema,
                            Err(e) => panic!("❌ 模型 {} 声明失败: {}", stringify!($name), e),
                        };

                        if let Err(e) = $crate::manager::register_model(schema.clone()) {
                            panic!("❌ 模型注册失败: {}", e);
                        }
                        $crate::debug_log!("✅ 模型自动注册成功: {}", stringify!($name));

                        schema
                    })
                    .clone()
            }

            /// 从字段名->值映射创建模型实例
            pub fn create(
                data: ::std::collections::HashMap<String, $crate::types::DataValue>,
            ) -> $crate::error::DomainResult<$crate::model::ModelInstance> {
                Self::schema().create(data)
            }

            /// 创建空实例（全部字段应用默认值）
            pub fn create_empty() -> $crate::error::DomainResult<$crate::model::ModelInstance> {
                Self::schema().create_empty()
            }

            /// 创建本模型的类型化集合
            pub fn collection(
                instances: Vec<$crate::model::ModelInstance>,
            ) -> $crate::error::DomainResult<$crate::model::ModelCollection> {
                Self::schema().collection(instances)
            }
        }
    };
}

/// 便捷宏：构造字段名->值映射
///
/// # 示例
///
/// ```ignore
/// let data = model_data! { id: 1, name: "John" };
/// ```
#[macro_export]
macro_rules! model_data {
    () => {
        ::std::collections::HashMap::<String, $crate::types::DataValue>::new()
    };
    ( $( $key:ident : $value:expr ),* $(,)? ) => {{
        let mut map = ::std::collections::HashMap::<String, $crate::types::DataValue>::new();
        $(
            map.insert(stringify!($key).to_string(), $crate::types::DataValue::from($value));
        )*
        map
    }};
}
