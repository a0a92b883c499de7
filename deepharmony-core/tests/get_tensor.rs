use deepharmony_core::{
    get_default_graph, get_tensor, has_default_override, Error, FQDtype, Graph, Shape,
    TensorData, TensorSpec,
};

#[test]
fn forwards_spec_to_default_graph() {
    let graph = Graph::new("forward");
    let _default = graph.as_default();

    let data = TensorData::arange(&Shape::from([2, 3]), 0.0f32, 1.0);
    let spec = TensorSpec::new([2, 3])
        .name("w")
        .dtype(FQDtype::FXP16)
        .trainable(false)
        .data(data.clone());
    let t = get_tensor(spec).unwrap();

    assert_eq!(t.graph().id(), graph.id());
    assert_eq!(graph.get_tensor_by_name("w").unwrap(), t);
    assert_eq!(t.shape(), Shape::from([2, 3]));
    assert_eq!(t.dtype(), FQDtype::FXP16);
    assert!(!t.is_trainable());
    assert_eq!(t.data(), Some(data));
}

#[test]
fn matches_direct_graph_call() {
    let via_facade = Graph::new("a");
    let direct = Graph::new("b");
    let spec = TensorSpec::new([4]).name("x").data(vec![1i32, 2, 3, 4]);

    let t = {
        let _default = via_facade.as_default();
        get_tensor(spec.clone()).unwrap()
    };
    let u = direct.tensor(spec).unwrap();

    assert_eq!(t.id(), u.id());
    assert_eq!(t.name(), u.name());
    assert_eq!(t.shape(), u.shape());
    assert_eq!(t.dtype(), u.dtype());
    assert_eq!(t.is_trainable(), u.is_trainable());
    assert_eq!(t.data(), u.data());
}

#[test]
fn shape_only_uses_defaults() {
    let graph = Graph::new("defaults");
    let _default = graph.as_default();

    let t = get_tensor(TensorSpec::new([2, 3])).unwrap();

    assert_eq!(t.name(), "tensor_0");
    assert_eq!(t.dtype(), FQDtype::FP32);
    assert!(t.is_trainable());
    assert_eq!(t.data(), None);
}

#[test]
fn uses_graph_active_at_call_time() {
    let first = Graph::new("first");
    let second = Graph::new("second");

    let a = {
        let _default = first.as_default();
        get_tensor(TensorSpec::new([1])).unwrap()
    };
    let b = {
        let _default = second.as_default();
        get_tensor(TensorSpec::new([1])).unwrap()
    };

    assert_eq!(a.graph().id(), first.id());
    assert_eq!(b.graph().id(), second.id());
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
}

#[test]
fn touches_only_the_default_graph() {
    let graph = Graph::new("active");
    let bystander = Graph::new("bystander");
    let _scope = graph.name_scope("layer").unwrap();
    let _default = graph.as_default();

    get_tensor(TensorSpec::new([3]).name("b")).unwrap();

    assert_eq!(graph.len(), 1);
    assert!(bystander.is_empty());
    assert_eq!(graph.current_scope(), "layer");
    assert!(has_default_override());
    assert_eq!(get_default_graph().id(), graph.id());
}

#[test]
fn errors_pass_through_unchanged() {
    let via_facade = Graph::new("a");
    let direct = Graph::new("b");
    let bad_specs = [
        TensorSpec::new([2, 0]),
        TensorSpec::new([usize::MAX, 2]).data(vec![0.0f32; 0]),
        TensorSpec::new([2]).dtype(FQDtype::FixedPoint {
            bits: 0,
            frac_bits: 0,
        }),
        TensorSpec::new([2, 2]).data(vec![1.0f32; 3]),
    ];

    for spec in bad_specs {
        let expected = direct.tensor(spec.clone()).unwrap_err();
        let _default = via_facade.as_default();
        assert_eq!(get_tensor(spec).unwrap_err(), expected);
    }
    assert!(via_facade.is_empty());
    assert!(direct.is_empty());
}

#[test]
fn duplicate_name_is_reported() {
    let graph = Graph::new("dup");
    let _default = graph.as_default();

    get_tensor(TensorSpec::new([1]).name("w")).unwrap();
    assert_eq!(
        get_tensor(TensorSpec::new([1]).name("w")).unwrap_err(),
        Error::DuplicateName("w".to_string())
    );
    assert_eq!(graph.len(), 1);
}
