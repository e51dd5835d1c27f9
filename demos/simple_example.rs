use tabular_ml::{LinearRegression, Matrix, Model};
use ndarray::array;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simple example with synthetic data
    println!("=== Simple Linear Regression Example ===\n");

    // Create sample data: y = 2x + 3 + noise
    let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0], vec![5.0]])?;
    let y = array![5.1, 6.9, 9.2, 11.1, 12.8];

    println!("Training data:");
    print!("X:\n{}", x);
    println!("y: {}", y);

    let mut model = LinearRegression::new();
    model.train(&x, &y)?;

    let predictions = model.predict(&x)?;
    let score = model.score(&x, &y)?;
    let mse = tabular_ml::metrics::mean_squared_error(&y, &predictions)?;

    let params = model.parameters();
    println!("\nResults:");
    println!("Intercept: {:.4}", params[0]);
    println!("Coefficient: {:.4}", params[1]);
    println!("R² score: {:.4}", score);
    println!("MSE: {:.4}", mse);

    println!("\nPredictions vs Actual:");
    for (i, (pred, actual)) in predictions.iter().zip(y.iter()).enumerate() {
        println!(
            "Sample {}: Predicted={:.2}, Actual={:.2}, Error={:.2}",
            i + 1,
            pred,
            actual,
            (pred - actual).abs()
        );
    }

    let new_x = Matrix::from_rows(&[vec![6.0], vec![7.0]])?;
    let new_predictions = model.predict(&new_x)?;
    println!("\nPredictions on new data:");
    for (i, pred) in new_predictions.iter().enumerate() {
        println!("X={:.1}: Predicted y={:.2}", new_x[(i, 0)], pred);
    }

    Ok(())
}
