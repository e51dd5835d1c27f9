use ndarray::array;
use tabular_ml::metrics::confusion_matrix;
use tabular_ml::{Dataset, LogisticRegression, Matrix, Model, StandardScaler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Logistic Regression Classification Example ===\n");

    // Feature: hours studied, Target: pass (1) or fail (0)
    let hours_studied = Matrix::from_rows(&[
        vec![1.0],
        vec![2.0],
        vec![3.0],
        vec![4.0],
        vec![5.0],
        vec![6.0],
        vec![7.0],
        vec![8.0],
    ])?;
    let passed = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];

    println!("Training data:");
    println!("Hours studied: {}", hours_studied.column(0)?);
    println!("Passed exam: {}", passed);

    let dataset = Dataset::new(hours_studied.clone(), passed.clone())?;
    let (train_data, test_data) = dataset.train_test_split(0.75, true, Some(3))?;

    println!("\nDataset split:");
    println!("Training samples: {}", train_data.n_samples());
    println!("Test samples: {}", test_data.n_samples());

    let mut scaler = StandardScaler::new();
    let train_features_scaled = scaler.fit_transform(&train_data.features)?;
    let test_features_scaled = scaler.transform(&test_data.features)?;

    let mut model = LogisticRegression::new()
        .learning_rate(0.5)
        .max_iterations(5000)
        .tolerance(1e-3);
    model.train(&train_features_scaled, &train_data.targets)?;

    println!(
        "\nTraining stopped after {} iterations (cost {:.4})",
        model.iterations_run(),
        model.final_cost().unwrap_or(f64::NAN)
    );

    let test_probabilities = model.predict(&test_features_scaled)?;
    let test_predictions = model.predict_labels(&test_features_scaled, 0.5)?;
    let accuracy = model.score(&test_features_scaled, &test_data.targets)?;

    println!("\nTest Results:");
    println!("Accuracy: {:.2}%", accuracy * 100.0);

    println!("\nPredictions vs Actual:");
    for (i, (&actual, (&predicted, &probability))) in test_data
        .targets
        .iter()
        .zip(test_predictions.iter().zip(test_probabilities.iter()))
        .enumerate()
    {
        println!(
            "Sample {}: Actual={:.0}, Predicted={:.0}, Probability={:.3}",
            i + 1,
            actual,
            predicted,
            probability
        );
    }

    println!("\nPredictions on new data:");
    let new_hours = Matrix::from_rows(&[vec![2.5], vec![5.5], vec![9.0]])?;
    let new_hours_scaled = scaler.transform(&new_hours)?;
    let new_probabilities = model.predict(&new_hours_scaled)?;

    for (row, &probability) in new_hours.row_iter().zip(new_probabilities.iter()) {
        let outcome = if probability >= 0.5 { "Pass" } else { "Fail" };
        println!(
            "Hours: {:.1} → Prediction: {} (probability: {:.3})",
            row[0], outcome, probability
        );
    }

    let full_predictions = model.predict_labels(&scaler.transform(&hours_studied)?, 0.5)?;
    let (classes, counts) = confusion_matrix(&passed, &full_predictions)?;

    println!("\nConfusion matrix on the full dataset (rows = actual):");
    println!("classes: {:?}", classes);
    print!("{}", counts);

    Ok(())
}
