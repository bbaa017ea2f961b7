//! Colour theme for the logpanel TUI.
//!
//! Themes are defined as TOML files. The built-in themes are embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Call [`Theme::load_default`] at startup and pass the result through
//! the application as a shared reference.

use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

/// One style entry, e.g. `{ fg = "cyan", bold = true }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    bold: bool,
    dim: bool,
    italic: bool,
    underlined: bool,
}

impl From<RawStyle> for Style {
    fn from(raw: RawStyle) -> Self {
        let flags = [
            (raw.bold, Modifier::BOLD),
            (raw.dim, Modifier::DIM),
            (raw.italic, Modifier::ITALIC),
            (raw.underlined, Modifier::UNDERLINED),
        ];
        let modifiers = flags
            .into_iter()
            .filter(|(on, _)| *on)
            .fold(Modifier::empty(), |acc, (_, m)| acc | m);

        Style {
            fg: raw.fg.as_deref().and_then(parse_color),
            bg: raw.bg.as_deref().and_then(parse_color),
            add_modifier: modifiers,
            ..Style::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    seq: RawStyle,
    time: RawStyle,
    content: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawToolbar {
    button: RawStyle,
    title: RawStyle,
    hint: RawStyle,
    live: RawStyle,
    ended: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBanner {
    new_entries: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCommand {
    prompt: RawStyle,
    error: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTheme {
    entry: RawEntry,
    borders: RawBorders,
    toolbar: RawToolbar,
    banner: RawBanner,
    command: RawCommand,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme. All styles are pre-resolved ratatui [`Style`]
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// `N)` sequence column.
    pub entry_seq: Style,
    /// Time-of-day column.
    pub entry_time: Style,
    pub entry_content: Style,

    /// Border style for the focused panel.
    pub border_focused: Style,
    /// Border style while the command bar has focus.
    pub border_unfocused: Style,

    /// The toolbar's Clear button.
    pub toolbar_button: Style,
    pub toolbar_title: Style,
    pub toolbar_hint: Style,
    /// Feed status marker while the producer is connected.
    pub toolbar_live: Style,
    /// Feed status marker once the producer has gone away.
    pub toolbar_ended: Style,

    /// "new entries" banner shown while scrolled away from the newest entry.
    pub banner: Style,

    /// `:` prompt of the command bar.
    pub command_prompt: Style,
    pub command_error: Style,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed; the theme tests guard this.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a built-in theme by name. Unknown names give the default theme.
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Self::load_gruvbox_dark(),
            _ => Self::load_default(),
        }
    }

    /// Parse a theme from a TOML string. Missing sections fall back to
    /// unstyled defaults; unknown keys are ignored.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            entry_seq: raw.entry.seq.into(),
            entry_time: raw.entry.time.into(),
            entry_content: raw.entry.content.into(),
            border_focused: raw.borders.focused.into(),
            border_unfocused: raw.borders.unfocused.into(),
            toolbar_button: raw.toolbar.button.into(),
            toolbar_title: raw.toolbar.title.into(),
            toolbar_hint: raw.toolbar.hint.into(),
            toolbar_live: raw.toolbar.live.into(),
            toolbar_ended: raw.toolbar.ended.into(),
            banner: raw.banner.new_entries.into(),
            command_prompt: raw.command.prompt.into(),
            command_error: raw.command.error.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const NAMED_COLORS: &[(&str, Color)] = &[
    ("reset", Color::Reset),
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("dark_gray", Color::DarkGray),
    ("light_red", Color::LightRed),
    ("light_green", Color::LightGreen),
    ("light_yellow", Color::LightYellow),
    ("light_blue", Color::LightBlue),
    ("light_magenta", Color::LightMagenta),
    ("light_cyan", Color::LightCyan),
    ("white", Color::White),
];

/// Parse a theme colour: a terminal colour name (`dark_gray`, `DarkGrey`,
/// `light-blue`), `#rrggbb`, or `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(n) = s.strip_prefix("indexed:") {
        return n.parse().ok().map(Color::Indexed);
    }

    let name = s.to_ascii_lowercase().replace('-', "_").replace("grey", "gray");
    let name = match name.as_str() {
        "darkgray" => "dark_gray",
        other => other,
    };
    NAMED_COLORS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
