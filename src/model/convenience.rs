//! 字段描述符便捷函数模块
//!
//! 提供创建各种字段描述符的便捷函数

use crate::model::field_types::{FieldDescriptor, FieldKind, ScalarKind, ValueGetter, ValueSetter};
use crate::model::record::Record;
use crate::model::traits::Entity;

/// 便捷函数：创建文本字段
pub fn text_field<E: Entity>(
    name: &'static str,
    get: ValueGetter<E>,
    set: ValueSetter<E>,
) -> FieldDescriptor<E> {
    FieldDescriptor::value(name, FieldKind::Scalar(ScalarKind::Text), get, set)
}

/// 便捷函数：创建整数字段
pub fn integer_field<E: Entity>(
    name: &'static str,
    get: ValueGetter<E>,
    set: ValueSetter<E>,
) -> FieldDescriptor<E> {
    FieldDescriptor::value(name, FieldKind::Scalar(ScalarKind::Integer), get, set)
}

/// 便捷函数：创建浮点数字段
pub fn float_field<E: Entity>(
    name: &'static str,
    get: ValueGetter<E>,
    set: ValueSetter<E>,
) -> FieldDescriptor<E> {
    FieldDescriptor::value(name, FieldKind::Scalar(ScalarKind::Float), get, set)
}

/// 便捷函数：创建布尔字段，存储为 1/0
pub fn boolean_field<E: Entity>(
    name: &'static str,
    get: ValueGetter<E>,
    set: ValueSetter<E>,
) -> FieldDescriptor<E> {
    FieldDescriptor::value(name, FieldKind::Scalar(ScalarKind::Boolean), get, set)
}

/// 便捷函数：创建数组字段
/// 存储时以实体描述的分隔符连接为一个文本列
pub fn array_field<E: Entity>(
    name: &'static str,
    item: ScalarKind,
    get: ValueGetter<E>,
    set: ValueSetter<E>,
) -> FieldDescriptor<E> {
    FieldDescriptor::value(name, FieldKind::Array(item), get, set)
}

/// 便捷函数：创建嵌套实体字段
/// 存储时只保存嵌套记录的ID，载入时按ID读回完整记录
pub fn nested_field<E: Entity, N: Entity>(
    name: &'static str,
    get: fn(&E) -> Option<&Record<N>>,
    get_mut: fn(&mut E) -> Option<&mut Record<N>>,
    set: fn(&mut E, Option<Record<N>>),
) -> FieldDescriptor<E> {
    FieldDescriptor::nested(name, get, get_mut, set)
}
