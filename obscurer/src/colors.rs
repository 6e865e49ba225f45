//! Colour log fragments, but only when logging to a terminal.
use crate::config::get_config;
use colored::Colorize;

pub trait MaybeColorize {
    fn green(&self) -> String;
    fn red(&self) -> String;
    fn purple(&self) -> String;
}

fn colorize(s: &str, paint: impl Fn(&str) -> colored::ColoredString) -> String {
    if get_config().general.tty {
        paint(s).to_string()
    } else {
        s.to_string()
    }
}

impl MaybeColorize for &str {
    fn green(&self) -> String {
        colorize(self, |s| Colorize::green(s))
    }

    fn red(&self) -> String {
        colorize(self, |s| Colorize::red(s))
    }

    fn purple(&self) -> String {
        colorize(self, |s| Colorize::purple(s))
    }
}

impl MaybeColorize for String {
    fn green(&self) -> String {
        MaybeColorize::green(&self.as_str())
    }

    fn red(&self) -> String {
        MaybeColorize::red(&self.as_str())
    }

    fn purple(&self) -> String {
        MaybeColorize::purple(&self.as_str())
    }
}
