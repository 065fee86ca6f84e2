//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - symbolic stabilizer-circuit simulation",
        style("qstab").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qstab-core  Observable algebra, qubit frames, circuit state");
    println!("  qstab-cli   Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
