pub mod clock;
pub mod string;

pub use clock::{Clock, ManualClock, SystemClock};
pub use string::{
    clean_title, display_name_from_id, fuzzy_key, normalize_item_id, remove_minecraft_colors,
    to_title_case,
};
