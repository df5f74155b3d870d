//! Page-side capabilities injected into controllers and submitters.
//!
//! [`Region`] is the one output area a collection controller owns. [`Page`]
//! covers every other visible effect an action can have: dialogs,
//! navigation, the inline status line, the cookbook button and the
//! test-run banner. Both take `&self` so several in-flight operations can
//! share one page.

use maud::Markup;

/// A replaceable block of markup.
pub trait Region {
    /// Replace the whole content of the region.
    fn replace(&self, content: Markup);
}

impl<R: Region + ?Sized> Region for &R {
    fn replace(&self, content: Markup) {
        (**self).replace(content)
    }
}

/// Color of the inline status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Success => "green",
            Tone::Error => "red",
        }
    }
}

/// Visual state of the save/remove cookbook button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookbookButton {
    pub in_cookbook: bool,
}

impl CookbookButton {
    pub fn new(in_cookbook: bool) -> Self {
        Self { in_cookbook }
    }

    pub fn label(&self) -> &'static str {
        if self.in_cookbook {
            "Remove from Cookbook"
        } else {
            "Save to Cookbook"
        }
    }

    pub fn color_class(&self) -> &'static str {
        if self.in_cookbook {
            "bg-red-600"
        } else {
            "bg-green-500"
        }
    }
}

pub trait Page {
    /// Modal notice the user must dismiss.
    fn alert(&self, message: &str);
    /// Yes/no prompt. `false` means the user declined.
    fn confirm(&self, prompt: &str) -> bool;
    /// Full navigation to another location.
    fn navigate(&self, location: &str);
    fn reload(&self);
    /// Set the inline status line under a settings form.
    fn show_message(&self, text: &str, tone: Tone);
    fn set_cookbook_button(&self, button: CookbookButton);
    fn show_banner(&self, banner: Markup);
    fn dismiss_banner(&self);
}

impl<P: Page + ?Sized> Page for &P {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
    fn navigate(&self, location: &str) {
        (**self).navigate(location)
    }
    fn reload(&self) {
        (**self).reload()
    }
    fn show_message(&self, text: &str, tone: Tone) {
        (**self).show_message(text, tone)
    }
    fn set_cookbook_button(&self, button: CookbookButton) {
        (**self).set_cookbook_button(button)
    }
    fn show_banner(&self, banner: Markup) {
        (**self).show_banner(banner)
    }
    fn dismiss_banner(&self) {
        (**self).dismiss_banner()
    }
}
