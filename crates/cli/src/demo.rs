//! The scripted demo sequence.

use kvadmin::{Command, DemoSettings};

use crate::parse::DemoArgs;

/// populate, delete-by-filter, list, scan; in that order.
///
/// Each step stands alone: a failure in one does not skip the rest. The scan
/// pages by the populate count unless `page_hint` is configured.
pub fn demo_commands(settings: &DemoSettings, args: &DemoArgs) -> Vec<Command> {
    let count = args.count.unwrap_or(settings.count);
    let filter = args.filter.as_deref().unwrap_or(&settings.filter);
    let page_hint = settings
        .page_hint
        .unwrap_or_else(|| usize::try_from(count).unwrap_or(usize::MAX).max(1));

    vec![
        Command::Populate { count },
        Command::delete_by_filter(filter),
        Command::ListKeys,
        Command::scan(settings.scan_pattern.as_str(), page_hint),
    ]
}
