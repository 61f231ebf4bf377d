// ============================================================================
// Basic Usage Example
// ============================================================================
//
// Run with `cargo run --example basic_usage --features logging` to see the
// constant pool derivation logs.

use precise::prelude::*;

fn main() -> Result<(), NumericError> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Fixed-Point Example ===\n");

    let a = FixedPoint::from(7);
    let b = FixedPoint::from(3);
    println!("{} + {} = {}", a, b, a + b);
    println!("{} - {} = {}", a, b, a - b);
    println!("{} * {} = {}", a, b, a * b);
    println!("{} / {} = {}", a, b, a.checked_div(b)?);
    println!("{} % {} = {}", a, b, a.checked_rem(b)?);

    // Negative values sweep upward from the integer part
    let neg = FixedPoint::from_f64(-0.25);
    println!("\n-0.25 is stored as {:?}", neg);

    println!("\n=== Powers and Roots ===");
    let x = FixedPoint::from_f64(1.5);
    for exponent in 0u8..=5 {
        println!("  {}^{} = {}", x, exponent, power(x, exponent)?);
    }
    for degree in 1u8..=4 {
        println!("  root({}, {}) = {:.18}", FixedPoint::TWO, degree, root(FixedPoint::TWO, degree)?);
    }

    println!("\n=== Errors ===");
    println!("  7 / 0      -> {:?}", a.checked_div(FixedPoint::ZERO));
    println!("  root(-1,2) -> {:?}", root(FixedPoint::from(-1), 2));
    println!("  0^0        -> {:?}", power(FixedPoint::ZERO, 0));

    println!("\n=== Constant Pool ===");
    let constants = Constants::initialize()?;
    println!("  pi   = {:.15}", constants.pi());
    println!("  tau  = {:.15}", constants.tau());
    println!("  e    = {:.15}", constants.e());
    println!("  √2   = {:.15}", constants.sqrt2());
    println!("  ∛3   = {:.15}", constants.cbrt3());
    println!(
        "  second initialize -> {:?}",
        Constants::initialize().map(|_| ())
    );

    Ok(())
}
