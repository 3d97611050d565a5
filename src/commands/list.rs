//! `stackforge list` - show every available stack.

use crate::registry;
use crate::ui::Reporter;

pub fn execute(reporter: &dyn Reporter) {
    reporter.info("📋 Available project stacks\n");

    let mut total = 0;
    for category in registry::categories() {
        let entries = registry::entries_in(*category);
        reporter.info(&format!("{}", category.label().to_uppercase()));
        for entry in &entries {
            reporter.detail(&format!(
                "  {:<18} {:<28} requires: {}",
                entry.id,
                entry.display_name,
                entry.requires.join(", ")
            ));
        }
        total += entries.len();
    }

    reporter.detail(&format!("\nTotal: {} stacks available", total));
    reporter.detail("  stackforge new my-app              # create a single project");
    reporter.detail("  stackforge new my-app --monorepo   # create a monorepo");
}
