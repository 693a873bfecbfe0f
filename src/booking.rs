use chrono::{Datelike, FixedOffset, Months, NaiveDate};
use tracing::info;

use crate::error::BookingError;
use crate::models::{Service, ServiceKind};

pub const TIME_SLOTS: &[&str] = &[
    "6:00 - 6:30PM",
    "7:00 - 7:30PM",
    "8:00 - 8:30PM",
    "9:00 - 9:30PM",
    "10:00 - 10:30PM",
    "11:00 - 11:30PM",
    "12:00 - 12:30PM",
    "1:00 - 1:30PM",
    "2:00 - 2:30PM",
    "3:00 - 3:30PM",
];

#[derive(Debug, PartialEq, Eq)]
pub struct Timezone {
    pub id: &'static str,
    pub label: &'static str,
    pub offset_minutes: i32,
}

impl Timezone {
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.offset_minutes * 60)
    }
}

pub const TIMEZONES: &[Timezone] = &[
    Timezone {
        id: "ist",
        label: "(GMT + 5:30) Chennai, Kolkata, Mumbai, New Delhi(IST)",
        offset_minutes: 330,
    },
    Timezone {
        id: "utc",
        label: "(GMT + 0:00) Coordinated Universal Time(UTC)",
        offset_minutes: 0,
    },
    Timezone {
        id: "gmt",
        label: "(GMT + 0:00) London, Dublin, Lisbon(GMT)",
        offset_minutes: 0,
    },
    Timezone {
        id: "est",
        label: "(GMT - 5:00) New York, Toronto(EST)",
        offset_minutes: -300,
    },
    Timezone {
        id: "pst",
        label: "(GMT - 8:00) Los Angeles, Vancouver(PST)",
        offset_minutes: -480,
    },
    Timezone {
        id: "sgt",
        label: "(GMT + 8:00) Singapore, Kuala Lumpur(SGT)",
        offset_minutes: 480,
    },
];

pub fn find_timezone(id: &str) -> Option<&'static Timezone> {
    let id = id.trim().to_lowercase();
    TIMEZONES.iter().find(|tz| tz.id == id)
}

/// "28 Oct, Tuesday"
pub fn format_booking_date(date: NaiveDate) -> String {
    date.format("%-d %b, %A").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    TimeSlot,
    Question,
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingSummary {
    pub service_title: String,
    pub service_type: &'static str,
    pub amount: u32,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub timezone: Option<&'static str>,
    pub question: Option<String>,
}

/// Booking state for one service.
///
/// Calls and packages go date, time slot, timezone, confirm. Priority DMs
/// need a question. Webinars are fixed to their own date and digital
/// products are bought directly.
#[derive(Debug, Clone)]
pub struct BookingFlow<'a> {
    service: &'a Service,
    date: NaiveDate,
    time_slot: Option<&'static str>,
    timezone: &'static Timezone,
    question: String,
}

impl<'a> BookingFlow<'a> {
    pub fn new(
        service: &'a Service,
        today: NaiveDate,
        default_timezone: &str,
    ) -> Result<Self, BookingError> {
        let timezone = find_timezone(default_timezone)
            .ok_or_else(|| BookingError::UnknownTimezone(default_timezone.to_string()))?;
        let date = match &service.kind {
            ServiceKind::Webinar { date } => *date,
            _ => today,
        };
        Ok(Self {
            service,
            date,
            time_slot: None,
            timezone,
            question: String::new(),
        })
    }

    pub fn service(&self) -> &Service {
        self.service
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timezone(&self) -> &'static Timezone {
        self.timezone
    }

    fn needs_slot(&self) -> bool {
        matches!(
            self.service.kind,
            ServiceKind::Call { .. } | ServiceKind::Package { .. }
        )
    }

    fn needs_question(&self) -> bool {
        matches!(self.service.kind, ServiceKind::PriorityDm { .. })
    }

    fn has_schedule(&self) -> bool {
        self.needs_slot() || matches!(self.service.kind, ServiceKind::Webinar { .. })
    }

    /// Choosing a different date drops the chosen time slot.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        if !self.needs_slot() {
            return Err(BookingError::NotApplicable(self.service.kind.type_label(), "date"));
        }
        if date != self.date {
            self.date = date;
            self.time_slot = None;
        }
        Ok(())
    }

    pub fn select_time_slot(&mut self, slot: &str) -> Result<(), BookingError> {
        if !self.needs_slot() {
            return Err(BookingError::NotApplicable(self.service.kind.type_label(), "time slot"));
        }
        let slot = TIME_SLOTS
            .iter()
            .find(|s| **s == slot.trim())
            .copied()
            .ok_or_else(|| BookingError::UnknownTimeSlot(slot.to_string()))?;
        self.time_slot = Some(slot);
        Ok(())
    }

    pub fn select_timezone(&mut self, id: &str) -> Result<(), BookingError> {
        if !self.has_schedule() {
            return Err(BookingError::NotApplicable(self.service.kind.type_label(), "timezone"));
        }
        self.timezone =
            find_timezone(id).ok_or_else(|| BookingError::UnknownTimezone(id.to_string()))?;
        Ok(())
    }

    /// `content` is whatever the question editor produced.
    pub fn set_question(&mut self, content: impl Into<String>) {
        self.question = content.into();
    }

    /// The first step still waiting for input.
    pub fn current_step(&self) -> BookingStep {
        if self.needs_slot() && self.time_slot.is_none() {
            BookingStep::TimeSlot
        } else if self.needs_question() && self.question.trim().is_empty() {
            BookingStep::Question
        } else {
            BookingStep::Confirm
        }
    }

    pub fn confirm(&self) -> Result<BookingSummary, BookingError> {
        match self.current_step() {
            BookingStep::TimeSlot => return Err(BookingError::MissingTimeSlot),
            BookingStep::Question => return Err(BookingError::MissingQuestion),
            BookingStep::Confirm => {}
        }

        let question = self.question.trim();
        let summary = BookingSummary {
            service_title: self.service.title.clone(),
            service_type: self.service.kind.type_label(),
            amount: self.service.amount,
            date: self.has_schedule().then_some(self.date),
            time_slot: self.time_slot.map(str::to_string),
            timezone: self.has_schedule().then_some(self.timezone.label),
            question: (!question.is_empty()).then(|| question.to_string()),
        };
        info!(
            service = %summary.service_title,
            kind = summary.service_type,
            date = ?summary.date,
            slot = ?summary.time_slot,
            "booking confirmed"
        );
        Ok(summary)
    }
}

/// Month grid for the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    first: NaiveDate,
}

impl Calendar {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            None => 31,
        }
    }

    pub fn prev_month(&self) -> Self {
        Self {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn next_month(&self) -> Self {
        Self {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    /// Moves `offset` months forward, or backward when negative.
    pub fn shifted(&self, offset: i32) -> Self {
        let mut calendar = *self;
        for _ in 0..offset.unsigned_abs() {
            calendar = if offset < 0 {
                calendar.prev_month()
            } else {
                calendar.next_month()
            };
        }
        calendar
    }

    /// Empty cells before the 1st in a Sunday-first week.
    pub fn leading_blank_days(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take(self.days_in_month() as usize)
    }
}
