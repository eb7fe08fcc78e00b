mod helpers;

mod authorization_test;
mod menu_test;
mod metric_test;
mod notification_test;
mod role_test;
