mod global {
    turf::style_sheet!("assets/global.css");
}

mod records {
    turf::style_sheet!("assets/records.css");
}

mod charts {
    turf::style_sheet!("assets/charts.css");
}

pub use charts::ClassName as Charts;
pub use global::ClassName as Global;
pub use records::ClassName as Records;

use std::sync::LazyLock;

pub static ALL: LazyLock<String> = LazyLock::new(|| {
    [
        global::STYLE_SHEET,
        records::STYLE_SHEET,
        charts::STYLE_SHEET,
    ]
    .join("\n")
});
