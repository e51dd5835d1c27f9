use approx::assert_abs_diff_eq;
use ndarray::array;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tabular_ml::metrics::{accuracy, r2_score};
use tabular_ml::{
    Dataset, DecisionTree, KNNClassifier, LinearRegression, LogisticRegression, Matrix, MlError,
    Model, StandardScaler, Vector,
};

fn all_models() -> Vec<(&'static str, Box<dyn Model>)> {
    vec![
        ("linear", Box::new(LinearRegression::new())),
        ("logistic", Box::new(LogisticRegression::new())),
        ("knn", Box::new(KNNClassifier::new(3))),
        ("tree", Box::new(DecisionTree::new())),
    ]
}

/// Two well separated blobs in 2-D, labelled 0 and 1.
fn blobs(n_per_class: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Matrix::random_uniform(2 * n_per_class, 2, -1.0, 1.0, &mut rng);

    let mut rows = Vec::with_capacity(2 * n_per_class);
    let mut targets = Vec::with_capacity(2 * n_per_class);
    for i in 0..2 * n_per_class {
        let (centre, label) = if i % 2 == 0 { (-3.0, 0.0) } else { (3.0, 1.0) };
        rows.push(vec![centre + noise[(i, 0)], centre + noise[(i, 1)]]);
        targets.push(label);
    }
    Dataset::new(Matrix::from_rows(&rows).unwrap(), Vector::from(targets)).unwrap()
}

#[test]
fn every_model_rejects_mismatched_samples() {
    let x = Matrix::ones(10, 2);
    let y = Vector::zeros(9);

    for (name, mut model) in all_models() {
        let result = model.train(&x, &y);
        assert!(
            matches!(result, Err(MlError::ShapeMismatch { .. })),
            "{name} accepted 10 rows with 9 targets"
        );
    }
}

#[test]
fn every_model_refuses_to_predict_before_training() {
    let x = Matrix::ones(2, 2);
    for (name, model) in all_models() {
        assert!(
            matches!(model.predict(&x), Err(MlError::NotFitted(_))),
            "{name} predicted without training"
        );
    }
}

#[test]
fn every_model_predicts_one_value_per_row() {
    let data = blobs(20, 3);
    for (name, mut model) in all_models() {
        model.train(&data.features, &data.targets).unwrap();
        let predictions = model.predict(&data.features).unwrap();
        assert_eq!(predictions.len(), data.n_samples(), "{name}");
    }
}

#[test]
fn parameters_follow_model_kind() {
    let data = blobs(10, 5);
    let mut models = all_models();
    for (_, model) in models.iter_mut() {
        model.train(&data.features, &data.targets).unwrap();
    }

    let lengths: Vec<usize> = models.iter().map(|(_, m)| m.parameters().len()).collect();
    // intercept + 2 coefficients for the linear models, nothing for the others
    assert_eq!(lengths, vec![3, 3, 0, 0]);
}

#[test]
fn classifiers_separate_held_out_blobs() {
    let data = blobs(40, 11);
    let (train, test) = data.train_test_split(0.75, true, Some(42)).unwrap();

    let mut knn = KNNClassifier::new(5);
    knn.train(&train.features, &train.targets).unwrap();
    assert_eq!(accuracy(&test.targets, &knn.predict(&test.features).unwrap()).unwrap(), 1.0);

    let mut tree = DecisionTree::new().max_depth(3).random_state(0);
    tree.train(&train.features, &train.targets).unwrap();
    assert_eq!(accuracy(&test.targets, &tree.predict(&test.features).unwrap()).unwrap(), 1.0);

    let mut logistic = LogisticRegression::new().learning_rate(0.1);
    logistic.train(&train.features, &train.targets).unwrap();
    let probabilities = logistic.predict(&test.features).unwrap();
    for (p, y) in probabilities.iter().zip(test.targets.iter()) {
        if *y == 1.0 {
            assert!(*p > 0.5, "class 1 sample got {p}");
        } else {
            assert!(*p < 0.5, "class 0 sample got {p}");
        }
    }
}

#[test]
fn linear_regression_on_standardized_features() {
    // y = 4*x1 - 2*x2 + 7
    let x = Matrix::from_rows(&[
        vec![1.0, 10.0],
        vec![2.0, 30.0],
        vec![3.0, 20.0],
        vec![4.0, 50.0],
        vec![5.0, 40.0],
    ])
    .unwrap();
    let y: Vector = x.row_iter().map(|r| 4.0 * r[0] - 2.0 * r[1] + 7.0).collect();

    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&x).unwrap();

    let mut model = LinearRegression::new();
    model.train(&scaled, &y).unwrap();
    let predictions = model.predict(&scaled).unwrap();

    assert_abs_diff_eq!(r2_score(&y, &predictions).unwrap(), 1.0, epsilon = 1e-9);
    // The intercept of a centered design is the target mean
    assert_abs_diff_eq!(model.intercept().unwrap(), y.mean().unwrap(), epsilon = 1e-9);
}

#[test]
fn tree_at_depth_zero_is_the_target_mean() {
    let x = Matrix::from_rows(&[vec![3.0], vec![1.0], vec![2.0]]).unwrap();
    let y = array![1.0, 5.0, 6.0];

    let mut tree = DecisionTree::new().max_depth(0);
    tree.train(&x, &y).unwrap();
    assert_eq!(tree.predict(&x).unwrap(), array![4.0, 4.0, 4.0]);
}

#[test]
fn csv_round_trip_into_a_model() {
    let csv = "x1,x2,label\n0,0,0\n0,1,0\n5,5,1\n6,5,1\n";
    let data = Dataset::from_reader(csv.as_bytes(), true, b',').unwrap();
    assert_eq!(data.feature_names, vec!["x1", "x2"]);

    let mut knn = KNNClassifier::new(1);
    knn.train(&data.features, &data.targets).unwrap();
    let query = Matrix::from_rows(&[vec![0.0, 1.0], vec![5.5, 5.0]]).unwrap();
    assert_eq!(knn.predict(&query).unwrap(), array![0.0, 1.0]);
}
