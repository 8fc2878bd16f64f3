pub mod geo;
pub mod hour_range;
pub mod metric_spec;
pub mod observation;
pub mod parameter;
pub mod series;
pub mod station;
pub mod weather_table;
