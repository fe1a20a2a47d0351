// Human readable rendering of latest values
pub fn render_number(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "-".to_string(),
    }
}

pub fn temperature_indicator(celsius: f64) -> &'static str {
    match celsius {
        t if t <= 0.0 => "❄️",
        t if t < 10.0 => "🥶",
        t if t < 15.0 => "😨",
        t if t < 21.0 => "😬",
        t if t < 32.0 => "😊",
        t if t < 35.0 => "🫠",
        _ => "🥵",
    }
}

pub fn humidity_indicator(percent: f64) -> &'static str {
    match percent {
        h if h < 10.0 => "🔥",
        h if h < 30.0 => "🌵",
        h if h <= 70.0 => "👌",
        h if h <= 90.0 => "🌴",
        _ => "💦",
    }
}
