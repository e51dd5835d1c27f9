use rand::SeedableRng;
use rand::rngs::StdRng;
use tabular_ml::metrics::{mean_squared_error, r2_score};
use tabular_ml::{Dataset, LinearRegression, Matrix, Model, StandardScaler, Vector};

/// Usage: `cargo run --example linear_regression_example [data.csv]`
///
/// The CSV needs a header row with the target in the last column. Without a
/// path a synthetic housing-style dataset is generated.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Linear Regression (normal equations) ===\n");

    // Step 1: Load data
    let dataset = match std::env::args().nth(1) {
        Some(path) => Dataset::from_csv(&path, true, b',')?,
        None => synthetic_housing(200, 42)?,
    };
    println!(
        "Dataset: {} samples, {} features",
        dataset.n_samples(),
        dataset.n_features()
    );

    // Step 2: Split into train/test
    let (train_data, test_data) = dataset.train_test_split(0.8, true, Some(7))?;

    // Step 3: Preprocessing - standardize features
    let mut scaler = StandardScaler::new();
    let train_features_scaled = scaler.fit_transform(&train_data.features)?;
    let test_features_scaled = scaler.transform(&test_data.features)?;

    // Step 4: Train linear regression model
    let mut model = LinearRegression::new();
    model.train(&train_features_scaled, &train_data.targets)?;

    // Step 5: Evaluate
    let train_predictions = model.predict(&train_features_scaled)?;
    let test_predictions = model.predict(&test_features_scaled)?;

    println!("Results:");
    println!(
        "  Training R² score: {:.4}",
        r2_score(&train_data.targets, &train_predictions)?
    );
    println!(
        "  Test R² score: {:.4}",
        r2_score(&test_data.targets, &test_predictions)?
    );
    println!(
        "  Training MSE: {:.4}",
        mean_squared_error(&train_data.targets, &train_predictions)?
    );
    println!(
        "  Test MSE: {:.4}",
        mean_squared_error(&test_data.targets, &test_predictions)?
    );

    // Step 6: Inspect model parameters
    let params = model.parameters();
    println!("  Intercept: {:.4}", params[0]);
    for (i, coeff) in params.iter().skip(1).enumerate() {
        let name = dataset
            .feature_names
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("x{}", i + 1));
        println!("  {}: {:.4}", name, coeff);
    }

    Ok(())
}

/// price = 50 * size + 20 * rooms - 3 * age + 100 + noise
fn synthetic_housing(n: usize, seed: u64) -> tabular_ml::Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw = Matrix::random_uniform(n, 4, 0.0, 1.0, &mut rng);

    let mut rows = Vec::with_capacity(n);
    let mut prices = Vec::with_capacity(n);
    for i in 0..n {
        let size = 1.0 + 3.0 * raw[(i, 0)];
        let rooms = (1.0 + 5.0 * raw[(i, 1)]).floor();
        let age = 40.0 * raw[(i, 2)];
        let noise = 10.0 * (raw[(i, 3)] - 0.5);
        prices.push(50.0 * size + 20.0 * rooms - 3.0 * age + 100.0 + noise);
        rows.push(vec![size, rooms, age]);
    }

    let mut dataset = Dataset::new(Matrix::from_rows(&rows)?, Vector::from(prices))?;
    dataset.feature_names = vec!["size".into(), "rooms".into(), "age".into()];
    Ok(dataset)
}
