use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAppointment, DbNotification, DbUser};

// Mock repositories for testing
mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            name: &'static str,
            email: &'static str,
            provider: bool,
        ) -> eyre::Result<DbUser>;

        pub async fn get_user_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn find_provider_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbUser>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn create_appointment(
            &self,
            user_id: Uuid,
            provider_id: Uuid,
            date: DateTime<Utc>,
        ) -> eyre::Result<DbAppointment>;

        pub async fn find_active_by_provider_and_date(
            &self,
            provider_id: Uuid,
            date: DateTime<Utc>,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn cancel_appointment(
            &self,
            id: Uuid,
        ) -> eyre::Result<DbAppointment>;
    }
}

mock! {
    pub NotificationRepo {
        pub async fn create_notification(
            &self,
            user_id: Uuid,
            content: &'static str,
        ) -> eyre::Result<DbNotification>;
    }
}
