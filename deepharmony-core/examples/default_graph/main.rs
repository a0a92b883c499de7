use deepharmony_core::{get_tensor, FQDtype, Graph, Result, Shape, TensorData, TensorSpec};

fn main() -> Result<()> {
    env_logger::init();

    let graph = Graph::new("lenet");
    let _default = graph.as_default();

    let input = get_tensor(TensorSpec::new([1, 1, 28, 28]).name("data").trainable(false))?;
    {
        let _scope = graph.name_scope("conv1")?;
        let shape = Shape::from([6, 1, 5, 5]);
        get_tensor(
            TensorSpec::new(shape.clone())
                .name("weights")
                .dtype(FQDtype::FXP8)
                .data(TensorData::randn::<f32>(&shape)),
        )?;
        get_tensor(TensorSpec::new([6]).name("bias").dtype(FQDtype::FXP32))?;
    }

    print!("{graph}");
    let weight_bits: usize = graph
        .trainable_tensors()
        .iter()
        .map(|t| t.size_in_bits())
        .sum();
    println!("input: {input}");
    println!("trainable storage: {weight_bits} bits");
    Ok(())
}
