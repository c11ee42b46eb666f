pub mod book;
pub mod chat_history;
pub mod coupon;
pub mod notification;
pub mod order;
pub mod policy;
pub mod question;
pub mod report;
pub mod section;
pub mod station;
pub mod subscription_plan;
pub mod ticket;
pub mod train;
pub mod user;
pub mod wallet;
