/// Default tolerance for floating-point comparisons
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Assert that two floating-point numbers are approximately equal
pub fn assert_approx_eq(actual: f64, expected: f64, tolerance: f64) {
  assert!(
    (actual - expected).abs() < tolerance,
    concat!(
      "Values not approximately equal:\n",
      "  actual:   {}\n  expected: {}\n  diff:     {}\n  tolerance: {}"
    ),
    actual,
    expected,
    (actual - expected).abs(),
    tolerance
  );
}

/// Percentages pass through one extra division, so allow a little more slack
pub fn assert_percentage_eq(actual: f64, expected: f64) {
  assert_approx_eq(actual, expected, 1e-8);
}

/// Assert that a floating-point value is approximately zero
pub fn assert_approx_zero(value: f64) {
  assert_approx_eq(value, 0.0, DEFAULT_TOLERANCE);
}

/// Assert every named value is approximately zero, reporting the first offender by name
pub fn assert_all_zero(values: &[(&str, f64)]) {
  for (name, value) in values {
    assert!(value.abs() < DEFAULT_TOLERANCE, "{} expected 0, got {}", name, value);
  }
}
