#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionOffset<'a> {
    pub id: &'a str,
    pub top: f64,
}

/// Last section, in document order, whose `top - activation_offset` is at or
/// above `scroll_y`. Later sections win when several qualify.
pub fn active_section<'a>(
    sections: &[SectionOffset<'a>],
    scroll_y: f64,
    activation_offset: f64,
) -> Option<&'a str> {
    sections
        .iter()
        .rev()
        .find(|section| scroll_y >= section.top - activation_offset)
        .map(|section| section.id)
}

pub fn link_is_active(href: &str, active: Option<&str>) -> bool {
    match (href.strip_prefix('#'), active) {
        (Some(fragment), Some(active)) => fragment == active,
        _ => false,
    }
}

pub fn navbar_is_solid(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Scroll destination for an in-page anchor, leaving room for the fixed navbar.
pub fn anchor_scroll_top(section_top: f64, nav_height: f64) -> f64 {
    section_top - nav_height
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    pub open: bool,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }

    pub fn closed(self) -> Self {
        Self { open: false }
    }

    pub fn class(self) -> Option<&'static str> {
        self.open.then_some("active")
    }
}
