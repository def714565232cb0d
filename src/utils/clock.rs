use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};

/// Represents an entity responsible for providing dates across application. Habits are tracked
/// by local calendar day, so the clock hands out local time. Swappable for tests.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn now(&self) -> DateTime<Local>;

    /// Calendar day check-ins are recorded against.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    async fn sleep(&self, duration: Duration);
}

#[derive(Clone)]
pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock frozen at a single moment.
#[cfg(test)]
#[derive(Clone)]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(test)]
impl FixedClock {
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        use chrono::TimeZone;

        let naive = date.and_hms_opt(hour, minute, 0).unwrap();
        Self(Local.from_local_datetime(&naive).earliest().unwrap())
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }

    async fn sleep(&self, _duration: Duration) {}
}
