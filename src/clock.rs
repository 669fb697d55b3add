use time::OffsetDateTime;

/// Source of the current time, used to expire cookies on delete
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock, in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> OffsetDateTime,
{
    fn now(&self) -> OffsetDateTime {
        (self)()
    }
}
