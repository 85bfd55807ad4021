use std::fmt::Write;

use chrono::NaiveTime;
use swampcool_lib::{Assessment, StopFlags};

const STOP_MESSAGES: [&str; 4] = [
    "You will be running during peak hours!",
    "Your home is cool enough!",
    "The cooler will not produce cold enough air!",
    "The air will be very humid!",
];

fn forecast_section(out: &mut String, a: &Assessment) -> std::fmt::Result {
    let ahead = &a.lookahead;
    writeln!(out, "  Outdoor temp (°F): {:.2}", a.outdoor_temperature)?;
    writeln!(
        out,
        "  Outdoor relative humidity (from 0 to 100): {:.2}",
        a.outdoor_humidity
    )?;
    writeln!(out, "  Output temp: {:.2}", a.vent_now.temperature)?;
    writeln!(out, "  Output relative humidity: {:.2}", a.vent_now.humidity)?;
    writeln!(
        out,
        "    ΔT = {:.2}    (ΔT determines water usage)",
        a.outdoor_temperature - a.vent_now.temperature
    )?;
    if !a.vent_now.reachable {
        writeln!(out, "    (outdoor conditions are off the cooler chart)")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  In {:.2} hour(s), output temp will be: {:.2}",
        ahead.step_hours, ahead.vent_soon.temperature
    )?;
    writeln!(
        out,
        "    Output relative humidity will be: {:.2}",
        ahead.vent_soon.humidity
    )?;
    writeln!(out, "    smartValue = {:.2}", ahead.smart_value)
}

/// Console summary of one decision.
pub fn summary(
    now: NaiveTime,
    assessment: Option<&Assessment>,
    flags: &StopFlags,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    if let Some(a) = assessment {
        if !a.is_trusted() {
            writeln!(out)?;
            writeln!(out, "  Warning, T < 70, so extrapolation cannot be trusted.")?;
            writeln!(out, "    Maybe just open some windows?")?;
        }
        writeln!(out)?;
        writeln!(out, "  Computer's 24-hour time: {}", now.format("%H:%M"))?;
        writeln!(out)?;
        forecast_section(&mut out, a)?;
    }

    writeln!(out)?;
    if flags.any() {
        for (_, message) in flags
            .as_array()
            .into_iter()
            .zip(STOP_MESSAGES)
            .filter(|(stop, _)| *stop)
        {
            writeln!(out, "  {message}")?;
        }
    } else {
        writeln!(out, "  Run your cooler!")?;
    }
    writeln!(out)?;
    Ok(out)
}
