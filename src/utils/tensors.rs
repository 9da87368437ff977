use burn::tensor::{backend::Backend, Data, Int, Shape, Tensor};

/// Stack rows of token ids that already share a length into a [rows, seq_length] tensor
pub fn int_tensor<B: Backend>(
    rows: &[Vec<usize>],
    seq_length: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = rows.len();

    let values = rows
        .iter()
        .flat_map(|row| row.iter().map(|&id| id as i32))
        .collect();

    Tensor::from_ints(Data::new(values, Shape::new([batch_size, seq_length])), device)
}
