//! Spinner shown while the candidate collection is still loading.

/// Spinner animation frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Alternative spinner using simple characters for compatibility.
const SIMPLE_SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

/// The type of spinner to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerStyle {
    /// Braille dots spinner (default).
    #[default]
    Braille,
    /// Simple ASCII spinner for compatibility.
    Simple,
}

impl SpinnerStyle {
    /// Look up a style by name, falling back to braille.
    pub fn by_name(name: &str) -> Self {
        match name {
            "simple" => SpinnerStyle::Simple,
            _ => SpinnerStyle::Braille,
        }
    }

    /// Get the frames for this spinner style.
    pub fn frames(&self) -> &'static [&'static str] {
        match self {
            SpinnerStyle::Braille => SPINNER_FRAMES,
            SpinnerStyle::Simple => SIMPLE_SPINNER_FRAMES,
        }
    }
}

/// An animated spinner, advanced once per tick.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: usize,
    style: SpinnerStyle,
}

impl Spinner {
    pub fn new(style: SpinnerStyle) -> Self {
        Self { frame: 0, style }
    }

    /// Advance the animation by one frame.
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % self.style.frames().len();
    }

    /// The current frame.
    pub fn frame(&self) -> &'static str {
        self.style.frames()[self.frame]
    }

    /// The current frame followed by `message`.
    pub fn text(&self, message: &str) -> String {
        format!("{} {}", self.frame(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        let mut spinner = Spinner::new(SpinnerStyle::Simple);
        assert_eq!(spinner.frame(), "|");
        spinner.tick();
        assert_eq!(spinner.frame(), "/");
        spinner.tick();
        spinner.tick();
        spinner.tick();
        assert_eq!(spinner.frame(), "|");
    }

    #[test]
    fn test_style_by_name() {
        assert_eq!(SpinnerStyle::by_name("simple"), SpinnerStyle::Simple);
        assert_eq!(SpinnerStyle::by_name("braille"), SpinnerStyle::Braille);
        assert_eq!(SpinnerStyle::by_name("dots"), SpinnerStyle::Braille);
    }

    #[test]
    fn test_spinner_text() {
        let spinner = Spinner::default();
        assert_eq!(spinner.text("Loading..."), "⠋ Loading...");
    }
}
