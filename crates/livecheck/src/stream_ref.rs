use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Embed host used for previews.
pub const EMBED_HOST: &str = "https://www.youtube-nocookie.com";

static WATCH_RE: Lazy<Regex> = Lazy::new(|| compile(r"youtube\.com/watch\?v=([^&]+)"));
static LIVE_RE: Lazy<Regex> = Lazy::new(|| compile(r"youtube\.com/live/([^/?]+)"));
static SHORT_RE: Lazy<Regex> = Lazy::new(|| compile(r"youtu\.be/([^?]+)"));
static CHANNEL_RE: Lazy<Regex> = Lazy::new(|| compile(r"youtube\.com/@([^/]+)/?"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("stream url patterns are valid")
}

/// What a resolved reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// A single video or live broadcast, addressed by video id.
    DirectVideo,
    /// Whatever a channel is currently streaming, addressed by handle.
    ChannelLive,
}

/// Canonical embeddable reference derived from a raw source URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StreamReference {
    pub kind: StreamKind,
    /// Video id for [`StreamKind::DirectVideo`], handle without `@` for
    /// [`StreamKind::ChannelLive`].
    pub identifier: String,
}

impl StreamReference {
    pub fn direct_video(identifier: impl Into<String>) -> Self {
        Self {
            kind: StreamKind::DirectVideo,
            identifier: identifier.into(),
        }
    }

    pub fn channel_live(handle: impl Into<String>) -> Self {
        Self {
            kind: StreamKind::ChannelLive,
            identifier: handle.into(),
        }
    }

    /// Playback URL on the default embed host.
    pub fn embed_url(&self) -> String {
        self.embed_url_on(EMBED_HOST)
    }

    /// Playback URL on an arbitrary embed host.
    pub fn embed_url_on(&self, host: &str) -> String {
        let host = host.trim_end_matches('/');
        match self.kind {
            StreamKind::DirectVideo => format!("{host}/embed/{}", self.identifier),
            StreamKind::ChannelLive => {
                format!("{host}/embed/live_stream?channel=@{}", self.identifier)
            }
        }
    }
}

impl fmt::Display for StreamReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.embed_url())
    }
}

/// Maps a pasted URL onto an embeddable reference.
///
/// Shapes are tried in a fixed order and the first match wins:
///
/// 1. `youtube.com/watch?v=<id>`
/// 2. `youtube.com/live/<id>`
/// 3. `youtu.be/<id>`
/// 4. `youtube.com/@<handle>`
///
/// Anything else, including the empty string, yields `None`. That is not an
/// error; it only means there is nothing to preview.
pub fn resolve(raw: &str) -> Option<StreamReference> {
    if raw.is_empty() {
        return None;
    }
    if let Some(id) = first_capture(&WATCH_RE, raw) {
        return Some(StreamReference::direct_video(id));
    }
    if let Some(id) = first_capture(&LIVE_RE, raw) {
        return Some(StreamReference::direct_video(id));
    }
    if let Some(id) = first_capture(&SHORT_RE, raw) {
        return Some(StreamReference::direct_video(id));
    }
    first_capture(&CHANNEL_RE, raw).map(StreamReference::channel_live)
}

/// Resolves `raw` and renders the preview URL on the default embed host.
pub fn preview_url(raw: &str) -> Option<String> {
    resolve(raw).map(|reference| reference.embed_url())
}

fn first_capture<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
