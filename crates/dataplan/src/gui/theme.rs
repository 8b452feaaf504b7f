use dial::render::DialPalette;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub fn dial_palette(context: &gtk::StyleContext) -> DialPalette {
    let fallback = DialPalette::default();
    DialPalette {
        track: lookup_color(context, "theme_fg_color", fallback.track, Some(0.25)),
        progress: lookup_color(context, "accent_bg_color", fallback.progress, None),
        thumb: lookup_color(context, "accent_bg_color", fallback.thumb, None),
    }
}

fn lookup_color(
    context: &gtk::StyleContext,
    name: &str,
    fallback: Srgba<f64>,
    alpha_override: Option<f64>,
) -> Srgba<f64> {
    context
        .lookup_color(name)
        .map(|c| {
            Srgba::new(
                c.red() as f64,
                c.green() as f64,
                c.blue() as f64,
                alpha_override.unwrap_or(c.alpha() as f64),
            )
        })
        .unwrap_or(fallback)
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.dial-volume {
    font-size: 32pt;
    font-weight: bold;
}
.dial-price {
    font-size: 14pt;
    opacity: 0.7;
}
.shortcut-chip {
    border-radius: 999px;
    padding: 4px 14px;
}
.shortcut-chip.active {
    background: @accent_bg_color;
    color: @accent_fg_color;
}
.budget-value {
    font-weight: bold;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
