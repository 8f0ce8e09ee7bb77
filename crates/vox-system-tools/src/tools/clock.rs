//! Tool: spoken time and date.

use chrono::NaiveDateTime;
use vox_protocol::ActionResult;

pub fn current_time(now: NaiveDateTime) -> ActionResult {
    let time = now.format("%I:%M %p").to_string();
    ActionResult::success(format!("The current time is {time}."))
        .with_data(serde_json::json!({ "time": time }))
}

pub fn current_date(now: NaiveDateTime) -> ActionResult {
    let date = now.format("%A, %B %d, %Y").to_string();
    ActionResult::success(format!("Today is {date}."))
        .with_data(serde_json::json!({ "date": date }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn twelve_hour_time() {
        assert_eq!(current_time(at(15, 7)).summary, "The current time is 03:07 PM.");
        assert_eq!(current_time(at(0, 30)).summary, "The current time is 12:30 AM.");
    }

    #[test]
    fn long_date() {
        let result = current_date(at(9, 0));
        assert_eq!(result.summary, "Today is Thursday, July 04, 2024.");
        assert_eq!(result.data.unwrap()["date"], "Thursday, July 04, 2024");
    }
}
