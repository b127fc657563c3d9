/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Element type tag for feeding areas.
pub const TYPE_FEEDING_AREA: &str = "feeding_area";

/// Element type tag for food bowls.
pub const TYPE_FOOD_BOWL: &str = "food_bowl";

/// Element type tag for water bowls.
pub const TYPE_WATER_BOWL: &str = "water_bowl";
