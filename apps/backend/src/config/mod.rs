pub mod db;
pub mod rewards;
