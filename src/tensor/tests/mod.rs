use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_new_and_properties() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(tensor.shape(), &[2, 3]);
    assert_eq!(tensor.dimension(), 2);
    assert_eq!(tensor.size(), 6);
    assert_eq!(tensor.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    // 行优先
    assert_eq!(tensor[[1, 0]], 4.0);
    assert_eq!(tensor[&[0, 2][..]], 3.0);
    assert_eq!(tensor.number(), None);
    assert_eq!(Tensor::new(&[7.0], &[1, 1]).number(), Some(7.0));
}

#[test]
#[should_panic(expected = "不一致")]
fn test_new_with_wrong_length() {
    let _ = Tensor::new(&[1.0, 2.0, 3.0], &[2, 2]);
}

#[test]
fn test_filled_zeros_ones() {
    assert_eq!(Tensor::filled(2.5, &[2]).to_vec(), vec![2.5, 2.5]);
    assert_eq!(Tensor::zeros(&[1, 2, 1]).to_vec(), vec![0.0, 0.0]);
    assert_eq!(Tensor::ones(&[3]).to_vec(), vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_index_mut_and_map() {
    let mut tensor = Tensor::zeros(&[2, 2, 1]);
    tensor[[1, 1, 0]] = 3.0;
    tensor[&[0, 1, 0][..]] = -1.0;
    assert_eq!(tensor.to_vec(), vec![0.0, -1.0, 0.0, 3.0]);

    let mut calls = 0;
    let doubled = tensor.map(|x| {
        calls += 1;
        x * 2.0
    });
    assert_eq!(calls, 4);
    assert_eq!(doubled.to_vec(), vec![0.0, -2.0, 0.0, 6.0]);
}

#[test]
fn test_random_tensors() {
    let mut rng = StdRng::seed_from_u64(42);
    let uniform = Tensor::uniform_with_rng(-1.0, 1.0, &[100], &mut rng);
    assert!(uniform.to_vec().iter().all(|x| (-1.0..1.0).contains(x)));

    // 空区间退化为常数
    let degenerate = Tensor::uniform_with_rng(0.5, 0.5, &[3], &mut rng);
    assert_eq!(degenerate.to_vec(), vec![0.5; 3]);

    let normal = Tensor::normal_with_rng(1.0, 0.1, &[1000], &mut rng);
    let mean = normal.to_vec().iter().sum::<f32>() / 1000.0;
    assert_abs_diff_eq!(mean, 1.0, epsilon = 0.05);

    // 相同种子得到相同结果
    let a = Tensor::normal_with_rng(0.0, 1.0, &[5], &mut StdRng::seed_from_u64(1));
    let b = Tensor::normal_with_rng(0.0, 1.0, &[5], &mut StdRng::seed_from_u64(1));
    assert_eq!(a, b);
}

#[test]
fn test_array_round_trip() {
    let array = ndarray::arr2(&[[1.0f32, 2.0], [3.0, 4.0]]).into_dyn();
    let tensor = Tensor::from_array(array.clone());
    assert_eq!(tensor.view(), array.view());
    assert_eq!(tensor.into_array(), array);
}
