use crate::nn::ParameterInitializer;
use crate::values::{self, Alternative, ArrayValue, CompositeValue2, CompositeValue3};
use ndarray::{Array3, Array4};

type ConvPad = CompositeValue2<ArrayValue<u64, 2>, String>;
type PoolPad = CompositeValue3<ArrayValue<u64, 2>, String, bool>;
type Bias = CompositeValue3<Array3<f32>, ParameterInitializer, bool>;

#[test]
fn test_default_composite_has_nothing_active() {
    let pad = PoolPad::default();
    assert_eq!(pad.active(), None);
    assert!(!pad.is_active::<0>());
    assert!(!pad.is_active::<1>());
    assert!(!pad.is_active::<2>());

    // 未激活的槽位依然持有默认值
    assert_eq!(pad.get::<0>(), &ArrayValue::new([0, 0]));
    assert_eq!(pad.get::<1>(), "");
    assert!(!*pad.get::<2>());
}

#[test]
fn test_assignment_activates_exactly_one_slot() {
    let pad: ConvPad = [2u64, 1].into();
    assert!(pad.is_active::<0>());
    assert!(!pad.is_active::<1>());
    assert_eq!(pad.get::<0>(), &ArrayValue::new([2, 1]));

    let pad: ConvPad = "same".into();
    assert!(!pad.is_active::<0>());
    assert!(pad.is_active::<1>());
    assert_eq!(pad.get::<1>(), "same");
    assert_eq!(pad.active(), Some(1));
}

#[test]
fn test_string_slot_accepts_literal_and_owned() {
    let from_literal: PoolPad = "none".into();
    let from_owned: PoolPad = String::from("none").into();
    assert_eq!(from_literal, from_owned);
    assert!(from_owned.is_active::<1>());
}

#[test]
fn test_array_slot_accepts_tuple_array_and_wrapped() {
    let from_tuple: PoolPad = (1u64, 2u64).into();
    let from_array: PoolPad = [1u64, 2].into();
    let from_wrapped: PoolPad = ArrayValue::new([1u64, 2]).into();
    assert_eq!(from_tuple, from_array);
    assert_eq!(from_array, from_wrapped);
    assert!(from_wrapped.is_active::<0>());
}

#[test]
fn test_bool_and_string_stay_distinguishable() {
    let as_bool: PoolPad = false.into();
    assert!(as_bool.is_active::<2>());
    assert!(!as_bool.is_active::<1>());
    assert!(!*as_bool.get::<2>());

    let as_string: PoolPad = "false".into();
    assert!(as_string.is_active::<1>());
    assert!(!as_string.is_active::<2>());
}

#[test]
fn test_reassignment_moves_active_slot() {
    let mut bias: Bias = ParameterInitializer::constant(0.5).into();
    assert!(bias.is_active::<1>());

    bias.set::<2>(false);
    assert!(bias.is_active::<2>());
    assert!(!bias.is_active::<1>());
    // 之前写入的值仍在槽位中
    assert_eq!(bias.get::<1>(), &ParameterInitializer::Constant(0.5));
}

#[test]
fn test_tensor_and_initializer_slots() {
    let weight: CompositeValue2<Array4<f32>, ParameterInitializer> =
        Array4::<f32>::ones((3, 3, 1, 2)).into();
    assert!(weight.is_active::<0>());
    assert_eq!(weight.get::<0>().shape(), &[3, 3, 1, 2]);

    let weight: CompositeValue2<Array4<f32>, ParameterInitializer> =
        ParameterInitializer::he_normal().into();
    assert!(weight.is_active::<1>());
    assert_eq!(weight.get::<0>().len(), 0);
}

#[test]
fn test_free_function_accessors() {
    let pad = ConvPad::with::<1>("valid".to_string());
    assert!(values::is_active::<1, _>(&pad));
    assert!(!values::is_active::<0, _>(&pad));
    assert_eq!(values::get::<1, _>(&pad), "valid");
}

/// 借助 `Alternative<K>` 写入任一槽位，返回写入后的激活下标
fn assign_slot<const K: usize, V: Alternative<K>>(target: &mut V, value: V::Value) -> Option<usize> {
    target.assign(value);
    target.active()
}

#[test]
fn test_every_slot_implements_alternative() {
    let mut pad = ConvPad::default();
    assert_eq!(assign_slot::<0, _>(&mut pad, ArrayValue::new([3, 3])), Some(0));
    assert_eq!(assign_slot::<1, _>(&mut pad, "full".to_string()), Some(1));
    assert_eq!(<ConvPad as Alternative<0>>::slot(&pad), &ArrayValue::new([3, 3]));

    let mut pool = PoolPad::default();
    assert_eq!(assign_slot::<0, _>(&mut pool, ArrayValue::new([1, 2])), Some(0));
    assert_eq!(assign_slot::<1, _>(&mut pool, "none".to_string()), Some(1));
    assert_eq!(assign_slot::<2, _>(&mut pool, true), Some(2));
    assert!(*<PoolPad as Alternative<2>>::slot(&pool));
    assert_eq!(<PoolPad as Alternative<1>>::slot(&pool), "none");
}
