//! Deterministic demo data used when the calendar source is unavailable.
//!
//! Every child gets the same five daily activities, with homework and play
//! staggered by one hour per child so overlapping families stay readable.
//! Generation is deterministic on purpose; demo randomization is a
//! non-goal.

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use crate::domain::calendar_service::DayBuckets;
use crate::domain::dates;
use crate::domain::models::child::ChildProfile;
use crate::domain::models::task::TaskInstance;

struct DemoSlot {
    slug: &'static str,
    title: &'static str,
    icon: &'static str,
    start_hour: u32,
    duration_minutes: i64,
    staggered: bool,
}

const DEMO_SLOTS: [DemoSlot; 5] = [
    DemoSlot {
        slug: "breakfast",
        title: "Breakfast",
        icon: "🍎",
        start_hour: 8,
        duration_minutes: 30,
        staggered: false,
    },
    DemoSlot {
        slug: "homework",
        title: "Homework",
        icon: "📚",
        start_hour: 14,
        duration_minutes: 60,
        staggered: true,
    },
    DemoSlot {
        slug: "play",
        title: "Free play",
        icon: "🎮",
        start_hour: 16,
        duration_minutes: 60,
        staggered: true,
    },
    DemoSlot {
        slug: "dinner",
        title: "Dinner",
        icon: "🍽️",
        start_hour: 19,
        duration_minutes: 30,
        staggered: false,
    },
    DemoSlot {
        slug: "bedtime",
        title: "Bedtime",
        icon: "🛏️",
        start_hour: 20,
        duration_minutes: 30,
        staggered: true,
    },
];

/// Generate demo day buckets for every child over `[start, end]` inclusive.
pub fn demo_buckets(children: &[ChildProfile], start: NaiveDate, end: NaiveDate) -> DayBuckets {
    let mut buckets = DayBuckets::new();

    let mut day = start;
    while day <= end {
        let key = dates::date_key(day);
        let mut tasks: Vec<TaskInstance> = Vec::new();

        for (index, child) in children.iter().enumerate() {
            for slot in &DEMO_SLOTS {
                let hour = if slot.staggered {
                    slot.start_hour + index as u32
                } else {
                    slot.start_hour
                };
                let Some(time) = chrono::NaiveTime::from_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let start_at = day.and_time(time);
                tasks.push(TaskInstance {
                    id: format!("{}_{}_{}", child.id, slot.slug, key),
                    template_id: format!("demo::{}", slot.slug),
                    assignee_id: Some(child.id.clone()),
                    title: slot.title.to_string(),
                    color: None,
                    icon: Some(slot.icon.to_string()),
                    start: start_at,
                    end: start_at + Duration::minutes(slot.duration_minutes),
                    done: false,
                    done_at: None,
                });
            }
        }

        tasks.sort_by_key(|t| t.start);
        buckets.insert(key, tasks);
        day += Duration::days(1);
    }

    buckets
}

/// Stand-in children used when not even the family store is readable.
pub fn placeholder_children() -> Vec<ChildProfile> {
    vec![
        ChildProfile {
            id: "kid1".to_string(),
            name: "Alice".to_string(),
            avatar_id: "bunny".to_string(),
            age: None,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
        },
        ChildProfile {
            id: "kid2".to_string(),
            name: "Bob".to_string(),
            avatar_id: "dragon".to_string(),
            age: None,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
        },
    ]
}
