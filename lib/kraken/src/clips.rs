//! Clip endpoints.
//!
//! See <https://dev.twitch.tv/docs/v5/reference/clips>.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::api::{ApiResponse, KrakenClient, NoParams};
use crate::{Error, HttpClient, Query, QueryValue, Result};

/// Characters escaped in a slug path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// A user referenced by a clip: its broadcaster or its curator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipUser {
    /// User id.
    pub id: String,
    /// Login name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Channel page URL.
    pub channel_url: String,
    /// Profile image URL.
    pub logo: String,
}

/// The VOD a clip was cut from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipVod {
    /// VOD id.
    pub id: String,
    /// VOD URL, with the clip offset as timestamp.
    pub url: String,
    /// Offset of the clip into the VOD, in seconds.
    pub offset: u64,
    /// Preview image of the VOD.
    pub preview_image_url: String,
}

/// Thumbnail URLs of a clip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipThumbnails {
    /// 480x272 thumbnail.
    pub medium: String,
    /// 260x147 thumbnail.
    pub small: String,
    /// 86x45 thumbnail.
    pub tiny: String,
}

/// A clip.
///
/// Only `slug` is required; other fields missing from a payload are defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip identifier used in URLs.
    pub slug: String,
    /// Tracking id.
    #[serde(default)]
    pub tracking_id: String,
    /// Public clip page.
    #[serde(default)]
    pub url: String,
    /// Embeddable player URL.
    #[serde(default)]
    pub embed_url: String,
    /// Embeddable player HTML snippet.
    #[serde(default)]
    pub embed_html: String,
    /// Channel the clip was taken from.
    #[serde(default)]
    pub broadcaster: ClipUser,
    /// User who created the clip.
    #[serde(default)]
    pub curator: ClipUser,
    /// Source VOD, absent when the VOD was deleted or never saved.
    #[serde(default)]
    pub vod: Option<ClipVod>,
    /// Broadcast id.
    #[serde(default)]
    pub broadcast_id: String,
    /// Game being played.
    #[serde(default)]
    pub game: String,
    /// Language of the stream.
    #[serde(default)]
    pub language: String,
    /// Clip title.
    #[serde(default)]
    pub title: String,
    /// View count.
    #[serde(default)]
    pub views: u64,
    /// Length in seconds.
    #[serde(default)]
    pub duration: f64,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Thumbnail URLs.
    #[serde(default)]
    pub thumbnails: ClipThumbnails,
}

/// A page of clips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManyClips {
    /// Clips in this page.
    pub clips: Vec<Clip>,
    /// Opaque cursor for the next page, empty on the last one.
    #[serde(rename = "_cursor")]
    pub cursor: String,
}

/// Response of [`KrakenClient::get_clip`].
pub type ClipResponse = ApiResponse<Clip>;

/// Response of [`KrakenClient::get_top_clips`] and [`KrakenClient::get_followed_clips`].
pub type ClipsResponse = ApiResponse<ManyClips>;

/// Window over which top clips are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
    /// All time.
    All,
}

impl Period {
    /// Query representation of the period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            other => Err(Error::invalid_request(format!(
                "unknown period \"{other}\", expected one of: day, week, month, all"
            ))),
        }
    }
}

impl QueryValue for Period {
    fn is_zero(&self) -> bool {
        false
    }

    fn to_query_value(&self) -> String {
        self.as_str().to_string()
    }
}

/// Query parameters of [`KrakenClient::get_top_clips`].
///
/// Unset fields are left out of the query, except `limit` and `period` which
/// fall back to `10` and `week`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Query)]
pub struct TopClipsParams {
    /// Channel name; comma separated for several channels.
    pub channel: String,
    /// Cursor from a previous page.
    pub cursor: String,
    /// Game name; comma separated for several games.
    pub game: String,
    /// Language code; comma separated for several languages.
    pub language: String,
    /// Page size, at most 100.
    #[query(default = 10)]
    pub limit: u32,
    /// Ranking window.
    #[query(default = "week")]
    pub period: Option<Period>,
    /// Rank trending clips instead of most viewed.
    pub trending: bool,
}

/// Query parameters of [`KrakenClient::get_followed_clips`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Query)]
pub struct FollowedClipsParams {
    /// Cursor from a previous page.
    pub cursor: String,
    /// Page size, at most 100.
    #[query(default = 10)]
    pub limit: u32,
    /// Rank trending clips instead of most viewed.
    pub trending: bool,
}

impl<C: HttpClient> KrakenClient<C> {
    /// Get a single clip by slug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `slug` is empty, `.` or `..`, otherwise the
    /// errors of [`KrakenClient::get`].
    pub async fn get_clip(&self, slug: &str) -> Result<ClipResponse> {
        if slug.is_empty() {
            return Err(Error::invalid_request("clip slug cannot be empty"));
        }
        // URL parsing would resolve these as dot segments and leave `/clips/`
        if slug == "." || slug == ".." {
            return Err(Error::invalid_request(format!("invalid clip slug \"{slug}\"")));
        }

        let path = format!("/clips/{}", utf8_percent_encode(slug, PATH_SEGMENT));
        self.get(&path, None::<&NoParams>).await
    }

    /// Get the top clips matching `params`.
    ///
    /// # Errors
    ///
    /// See [`KrakenClient::get`].
    pub async fn get_top_clips(&self, params: &TopClipsParams) -> Result<ClipsResponse> {
        self.get("/clips/top", Some(params)).await
    }

    /// Get the top clips of the games followed by the authenticated user.
    ///
    /// Requires an access token with the `user_read` scope.
    ///
    /// # Errors
    ///
    /// See [`KrakenClient::get`].
    pub async fn get_followed_clips(&self, params: &FollowedClipsParams) -> Result<ClipsResponse> {
        self.get("/clips/followed", Some(params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_query_string;

    #[test]
    fn top_clips_defaults() {
        assert_eq!(
            to_query_string(&TopClipsParams::default()),
            "limit=10&period=week&trending=false"
        );
    }

    #[test]
    fn top_clips_all_fields() {
        let params = TopClipsParams {
            channel: "summit1g".to_string(),
            cursor: "MQ==".to_string(),
            game: "Sea of Thieves".to_string(),
            language: "en".to_string(),
            limit: 1,
            period: Some(Period::All),
            trending: true,
        };

        assert_eq!(
            to_query_string(&params),
            "channel=summit1g&cursor=MQ%3D%3D&game=Sea+of+Thieves&language=en&limit=1&period=all&trending=true"
        );
    }

    #[test]
    fn followed_clips_defaults() {
        let params = FollowedClipsParams {
            trending: true,
            ..FollowedClipsParams::default()
        };
        assert_eq!(to_query_string(&params), "limit=10&trending=true");
    }

    #[test]
    fn period_round_trip() {
        for period in [Period::Day, Period::Week, Period::Month, Period::All] {
            assert_eq!(period.to_string().parse::<Period>().ok(), Some(period));
        }
        assert!("year".parse::<Period>().is_err());
    }

    #[test]
    fn slug_is_escaped() {
        assert_eq!(
            utf8_percent_encode("a/b?c d", PATH_SEGMENT).to_string(),
            "a%2Fb%3Fc%20d"
        );
        assert_eq!(
            utf8_percent_encode("AwkwardHelplessSalamanderSwiftRage", PATH_SEGMENT).to_string(),
            "AwkwardHelplessSalamanderSwiftRage"
        );
    }
}
