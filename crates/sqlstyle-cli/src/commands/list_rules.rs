//! List rules command implementation.

use sqlstyle_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - L033 (default)");
    println!("  all          - Every available rule");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  sqlstyle lint --rules union-qualifier");
    println!("  sqlstyle fix --rules L033");
}
