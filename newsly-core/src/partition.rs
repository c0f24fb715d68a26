use crate::calendar::CalendarDay;
use crate::types::FeaturedItem;
use chrono::TimeZone;

/// Feed items split by calendar day, each half in input order.
#[derive(Debug, Default, PartialEq)]
pub struct DayPartition<'a> {
    pub today: Vec<&'a FeaturedItem>,
    pub earlier: Vec<&'a FeaturedItem>,
}

impl<'a> DayPartition<'a> {
    pub fn len(&self) -> usize {
        self.today.len() + self.earlier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.earlier.is_empty()
    }
}

/// Undated items always land in `earlier`.
pub fn partition_by_day<'a, I, Tz>(items: I, day: &CalendarDay<Tz>) -> DayPartition<'a>
where
    I: IntoIterator<Item = &'a FeaturedItem>,
    Tz: TimeZone,
{
    let mut partition = DayPartition::default();
    for item in items {
        if day.is_today(item) {
            partition.today.push(item);
        } else {
            partition.earlier.push(item);
        }
    }
    partition
}
