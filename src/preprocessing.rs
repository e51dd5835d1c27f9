use log::debug;
use ndarray::Axis;

use crate::error::{MlError, Result};
use crate::{Matrix, Vector};

fn check_fit_input(op: &'static str, data: &Matrix) -> Result<()> {
    if data.rows() == 0 {
        return Err(MlError::InvalidArgument(format!("{op}: no samples to fit")));
    }
    Ok(())
}

fn check_fitted_width(data: &Matrix, width: usize) -> Result<()> {
    if data.cols() != width {
        return Err(MlError::shape(
            "transform",
            (data.rows(), width),
            data.shape(),
        ));
    }
    Ok(())
}

/// Centers each column on its mean and divides by its population standard
/// deviation. Zero-variance columns are only centered.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    mean: Option<Vector>,
    std: Option<Vector>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    pub fn std(&self) -> Option<&Vector> {
        self.std.as_ref()
    }

    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        check_fit_input("StandardScaler::fit", data)?;
        let array = data.as_array();
        let mean = array
            .mean_axis(Axis(0))
            .ok_or_else(|| MlError::InvalidArgument("matrix has no rows".to_string()))?;
        let std = array.std_axis(Axis(0), 0.0);

        debug!("StandardScaler: fitted {} columns", mean.len());
        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => (mean, std),
            _ => return Err(MlError::NotFitted("StandardScaler")),
        };
        check_fitted_width(data, mean.len())?;

        let mut result = data.clone().into_array();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row -= mean;
            row.zip_mut_with(std, |v, &s| {
                if s > 0.0 {
                    *v /= s;
                }
            });
        }

        Ok(Matrix::from(result))
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        self.transform(data)
    }
}

/// Rescales each column linearly onto `[0, 1]` using the fitted minimum and
/// maximum. Zero-range columns map to 0.
#[derive(Clone, Debug, Default)]
pub struct MinMaxScaler {
    min: Option<Vector>,
    range: Option<Vector>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self {
            min: None,
            range: None,
        }
    }

    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        check_fit_input("MinMaxScaler::fit", data)?;
        let array = data.as_array();
        let min = array.fold_axis(Axis(0), f64::INFINITY, |&acc, &v| acc.min(v));
        let max = array.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &v| acc.max(v));

        self.range = Some(&max - &min);
        self.min = Some(min);
        Ok(())
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let (min, range) = match (&self.min, &self.range) {
            (Some(min), Some(range)) => (min, range),
            _ => return Err(MlError::NotFitted("MinMaxScaler")),
        };
        check_fitted_width(data, min.len())?;

        let mut result = data.clone().into_array();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row -= min;
            row.zip_mut_with(range, |v, &r| {
                *v = if r > 0.0 { *v / r } else { 0.0 };
            });
        }

        Ok(Matrix::from(result))
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        self.transform(data)
    }
}

/// Prepends a column of ones.
pub fn add_bias(features: &Matrix) -> Matrix {
    features.with_intercept()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn m(rows: &[Vec<f64>]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let data = m(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let mut scaler = StandardScaler::new();

        let scaled = scaler.fit_transform(&data).unwrap();
        assert_eq!(scaled.shape(), data.shape());
        assert_eq!(scaler.mean().unwrap(), &array![3.0, 4.0]);

        let std = (8.0f64 / 3.0).sqrt();
        assert_abs_diff_eq!(scaled[(0, 0)], -2.0 / std, epsilon = 1e-12);
        assert_abs_diff_eq!(scaled[(1, 1)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaled[(2, 1)], 2.0 / std, epsilon = 1e-12);
    }

    #[test]
    fn test_standard_scaler_constant_column() {
        let data = m(&[vec![1.0, 7.0], vec![3.0, 7.0]]);
        let scaled = StandardScaler::new().fit_transform(&data).unwrap();

        assert_eq!(scaled[(0, 1)], 0.0);
        assert_eq!(scaled[(1, 1)], 0.0);
        assert_abs_diff_eq!(scaled[(0, 0)], -1.0);
    }

    #[test]
    fn test_min_max_scaler() {
        let data = m(&[vec![0.0, 5.0, 1.0], vec![5.0, 5.0, 3.0], vec![10.0, 5.0, 2.0]]);
        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&data).unwrap();

        let expected = m(&[vec![0.0, 0.0, 0.0], vec![0.5, 0.0, 1.0], vec![1.0, 0.0, 0.5]]);
        assert!(scaled.approx_eq(&expected, 1e-12));

        // Unseen values fall outside [0, 1]
        let out = scaler.transform(&m(&[vec![20.0, 5.0, 0.0]])).unwrap();
        assert_abs_diff_eq!(out[(0, 0)], 2.0);
        assert_abs_diff_eq!(out[(0, 2)], -0.5);
    }

    #[test]
    fn test_scaler_errors() {
        let data = m(&[vec![1.0, 2.0]]);
        assert!(matches!(
            StandardScaler::new().transform(&data),
            Err(MlError::NotFitted(_))
        ));
        assert!(matches!(
            MinMaxScaler::new().transform(&data),
            Err(MlError::NotFitted(_))
        ));

        let mut scaler = StandardScaler::new();
        scaler.fit(&data).unwrap();
        assert!(matches!(
            scaler.transform(&m(&[vec![1.0]])),
            Err(MlError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            scaler.fit(&Matrix::zeros(0, 2)),
            Err(MlError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_bias() {
        let biased = add_bias(&m(&[vec![2.0], vec![3.0]]));
        assert_eq!(biased, m(&[vec![1.0, 2.0], vec![1.0, 3.0]]));
    }
}
