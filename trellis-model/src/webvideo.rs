//! Web video fields: URL recognition and embeddable player output.
//!
//! Player settings are layered: engine defaults, then the field's `player`
//! declaration, then call-site options. Each layer may carry a nested
//! per-provider table (`youtube`, `vimeo`) which merges the same way.

use crate::kind::{HTML, JSON, escape_ampersands, escape_for};
use crate::options::{RenderOptions, merge_options};
use crate::prototype::FieldPrototype;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static YOUTUBE_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?youtube\.com/watch\?(?:.*&)?v=([^&#]+)")
        .expect("youtube pattern is valid")
});

static YOUTUBE_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://youtu\.be/([^?&#/]+)").expect("youtu.be pattern is valid")
});

static VIMEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?vimeo\.com/(\d+)").expect("vimeo pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    YouTube,
    Vimeo,
}

impl VideoProvider {
    /// Name of the provider's settings table and the exported video type.
    pub fn key(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Vimeo => "vimeo",
        }
    }
}

/// A recognised video: provider plus the provider's video id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoSource {
    pub provider: VideoProvider,
    pub id: String,
}

impl VideoSource {
    /// Recognises YouTube and Vimeo URLs. Anything else is `None`.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let capture = |re: &Regex| {
            re.captures(url)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        };

        if let Some(id) = capture(&YOUTUBE_WATCH).or_else(|| capture(&YOUTUBE_SHORT)) {
            return Some(Self {
                provider: VideoProvider::YouTube,
                id,
            });
        }
        capture(&VIMEO).map(|id| Self {
            provider: VideoProvider::Vimeo,
            id,
        })
    }

    pub fn video_type(&self) -> &'static str {
        self.provider.key()
    }
}

pub(crate) fn generate(
    format: &str,
    raw: &str,
    prototype: &FieldPrototype,
    options: &RenderOptions,
) -> String {
    let source = match VideoSource::parse(raw) {
        Some(source) if format == HTML || format == JSON => source,
        _ => return escape_for(format, raw),
    };
    let settings = merge_options(prototype.player(), &Value::Object(options.clone()));
    let attributes = player_attributes(&source, &settings);

    if format == JSON {
        player_descriptor(attributes).to_string()
    } else {
        player_html(&attributes)
    }
}

/// `{"tagname": "iframe", "tag": "<iframe/>", "attr": {...}}`
fn player_descriptor(attributes: Vec<(&'static str, Value)>) -> Value {
    let attr: Map<String, Value> = attributes
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    json!({
        "tagname": "iframe",
        "tag": "<iframe/>",
        "attr": attr,
    })
}

fn player_html(attributes: &[(&'static str, Value)]) -> String {
    let mut html = String::from("<iframe");
    for (name, value) in attributes {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        html.push_str(&format!(
            " {name}=\"{}\"",
            escape_ampersands(&text).replace('"', "&quot;")
        ));
    }
    html.push_str("></iframe>");
    html
}

fn player_attributes(source: &VideoSource, settings: &Value) -> Vec<(&'static str, Value)> {
    let width = settings.get("width").cloned().unwrap_or_else(|| 640.into());
    let height = settings.get("height").cloned().unwrap_or_else(|| 360.into());
    let fullscreen = flag(settings, "fullscreen").unwrap_or(false);

    let src = match source.provider {
        VideoProvider::YouTube => format!(
            "http://www.youtube.com/embed/{}?{}",
            source.id,
            query_string(&youtube_params(settings))
        ),
        VideoProvider::Vimeo => format!(
            "http://player.vimeo.com/video/{}?{}",
            source.id,
            query_string(&vimeo_params(settings))
        ),
    };

    let mut attributes = vec![
        ("type", Value::from("text/html")),
        ("width", width),
        ("height", height),
        ("src", Value::from(src)),
        ("frameborder", Value::from("0")),
    ];
    if source.provider == VideoProvider::Vimeo && fullscreen {
        attributes.push(("webkitAllowFullScreen", Value::from("yes")));
        attributes.push(("allowFullScreen", Value::from("yes")));
    }
    attributes
}

fn youtube_params(settings: &Value) -> BTreeMap<String, String> {
    let mut params = provider_params(settings, VideoProvider::YouTube);
    for (param, setting) in [
        ("fs", "fullscreen"),
        ("autoplay", "autoplay"),
        ("showinfo", "showinfo"),
        ("loop", "loop"),
    ] {
        if let Some(value) = settings.get(setting).and_then(param_value) {
            params.entry(param.to_string()).or_insert(value);
        }
    }
    params
}

fn vimeo_params(settings: &Value) -> BTreeMap<String, String> {
    let mut params = provider_params(settings, VideoProvider::Vimeo);
    for setting in ["autoplay", "loop"] {
        if let Some(value) = settings.get(setting).and_then(param_value) {
            params.entry(setting.to_string()).or_insert(value);
        }
    }
    // title, byline and portrait follow `showinfo` unless set explicitly
    let showinfo = flag(settings, "showinfo").unwrap_or(true);
    for setting in ["title", "byline", "portrait"] {
        let value = settings
            .get(setting)
            .and_then(param_value)
            .unwrap_or_else(|| bool_param(showinfo));
        params.entry(setting.to_string()).or_insert(value);
    }
    params
}

/// Parameters from the provider's own settings table.
fn provider_params(settings: &Value, provider: VideoProvider) -> BTreeMap<String, String> {
    settings
        .get(provider.key())
        .and_then(Value::as_object)
        .map(|table| {
            table
                .iter()
                .filter_map(|(key, value)| param_value(value).map(|v| (key.clone(), v)))
                .collect()
        })
        .unwrap_or_default()
}

fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(bool_param(*b)),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn bool_param(b: bool) -> String {
    (if b { "1" } else { "0" }).to_string()
}

fn flag(settings: &Value, key: &str) -> Option<bool> {
    match settings.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

fn query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
