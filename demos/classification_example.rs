use rand::SeedableRng;
use rand::rngs::StdRng;
use tabular_ml::metrics::{accuracy, confusion_matrix};
use tabular_ml::{
    Dataset, DecisionTree, KNNClassifier, LogisticRegression, Matrix, MinMaxScaler, Model, Vector,
    stats,
};

/// Three noisy clusters in the plane, labelled 0, 1 and 2.
fn three_clusters(n_per_class: usize, seed: u64) -> tabular_ml::Result<Dataset> {
    let centres = [(0.0, 0.0), (4.0, 0.5), (2.0, 4.0)];
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Matrix::random_uniform(3 * n_per_class, 2, -1.2, 1.2, &mut rng);

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for i in 0..3 * n_per_class {
        let class = i % 3;
        let (cx, cy) = centres[class];
        rows.push(vec![cx + noise[(i, 0)], cy + noise[(i, 1)]]);
        labels.push(class as f64);
    }
    Dataset::new(Matrix::from_rows(&rows)?, Vector::from(labels))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Multi-class Classification Example ===\n");

    let dataset = three_clusters(60, 2024)?;
    println!("Feature correlation:\n{}", stats::correlation_matrix(&dataset.features)?);

    let (train, test) = dataset.train_test_split(0.7, true, Some(11))?;
    let mut scaler = MinMaxScaler::new();
    let train_x = scaler.fit_transform(&train.features)?;
    let test_x = scaler.transform(&test.features)?;

    let mut models: Vec<(&str, Box<dyn Model>)> = vec![
        ("KNN (k=5)", Box::new(KNNClassifier::new(5))),
        (
            "Decision tree (depth 4)",
            Box::new(DecisionTree::new().max_depth(4).random_state(1)),
        ),
        (
            "Decision tree (depth 4, 1 feature/node)",
            Box::new(DecisionTree::new().max_depth(4).max_features(1).random_state(1)),
        ),
    ];

    for (name, model) in models.iter_mut() {
        model.train(&train_x, &train.targets)?;
        // Tree leaves are class means; round them back onto labels
        let predictions = model.predict(&test_x)?.mapv(f64::round);
        let score = accuracy(&test.targets, &predictions)?;
        println!("{:<40} accuracy {:.3}", name, score);
    }

    let (_, knn) = &models[0];
    let (classes, counts) = confusion_matrix(&test.targets, &knn.predict(&test_x)?)?;
    println!("\nKNN confusion matrix, classes {:?} (rows = actual):", classes);
    print!("{}", counts);

    // One-vs-rest on class 2 with logistic regression
    let is_top: Vector = train.targets.mapv(|y| if y == 2.0 { 1.0 } else { 0.0 });
    let mut logistic = LogisticRegression::new().learning_rate(1.0).max_iterations(2000);
    logistic.train(&train_x, &is_top)?;
    let test_is_top = test.targets.mapv(|y| if y == 2.0 { 1.0 } else { 0.0 });
    println!(
        "\nLogistic regression, class 2 vs rest: accuracy {:.3}",
        logistic.score(&test_x, &test_is_top)?
    );

    Ok(())
}
