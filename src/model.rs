use chrono::NaiveDate;
use comicsync_schema::ComicInfo;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Externally assigned, sequential comic number.
pub type ComicId = u32;

/// A comic as persisted in `xkcd_comics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub id: ComicId,
    pub title: String,
    pub img_url: String,
    pub alt_text: String,
    pub date_published: NaiveDate,
}

/// What the poller needs from the "latest" endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicSummary {
    pub id: ComicId,
    pub title: String,
}

impl From<ComicInfo> for ComicSummary {
    fn from(info: ComicInfo) -> Self {
        Self {
            id: info.num,
            title: info.title,
        }
    }
}

impl TryFrom<ComicInfo> for Comic {
    type Error = FetchError;

    fn try_from(info: ComicInfo) -> Result<Self, Self::Error> {
        let id = info.num;
        let missing = |field| FetchError::MissingField { id, field };

        let img_url = info.img.ok_or_else(|| missing("img"))?;
        let alt_text = info.alt.ok_or_else(|| missing("alt"))?;
        let year = info.year.ok_or_else(|| missing("year"))?;
        let month = info.month.ok_or_else(|| missing("month"))?;
        let day = info.day.ok_or_else(|| missing("day"))?;

        let date_published = parse_publication_date(&year, &month, &day)
            .ok_or(FetchError::InvalidDate {
                id,
                year,
                month,
                day,
            })?;

        Ok(Self {
            id,
            title: info.title,
            img_url,
            alt_text,
            date_published,
        })
    }
}

fn parse_publication_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year = year.trim().parse::<i32>().ok()?;
    let month = month.trim().parse::<u32>().ok()?;
    let day = day.trim().parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
