use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use heater_timer_calculator::{
    parse_datetime, ClockTime, HeaterClockSetting, HeaterTimerForm, TimerPreset, DEFAULT_REFERENCE,
};
use log::debug;

/// Works out what to set a heater's clock timer to so the heater comes on
/// at the expected start time.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Current time, YYYY-MM-DDTHH:MM [default: now]
    #[arg(long, value_parser = parse_datetime)]
    now: Option<NaiveDateTime>,

    /// When the heater should start, YYYY-MM-DDTHH:MM
    #[arg(long, value_parser = parse_datetime)]
    expected: NaiveDateTime,

    /// Time the timer fires on its own clock, e.g. 00:30 or "1:30 AM"
    #[arg(long, conflicts_with = "preset")]
    reference: Option<ClockTime>,

    /// half-past-midnight or half-past-one
    #[arg(long)]
    preset: Option<TimerPreset>,
}

impl Cli {
    fn reference(&self) -> ClockTime {
        match (self.reference, self.preset) {
            (Some(t), _) => t,
            (None, Some(preset)) => preset.clock_time(),
            (None, None) => DEFAULT_REFERENCE,
        }
    }
}

fn run(cli: &Cli, now: NaiveDateTime) -> Result<HeaterClockSetting> {
    let mut form = HeaterTimerForm::with_reference(cli.now.unwrap_or(now), cli.reference());
    form.set_expected_start(Some(cli.expected));
    let setting = form.calculate()?;
    debug!(
        "now {} expected {} reference {} -> {}",
        form.current_time(),
        cli.expected,
        form.reference(),
        setting
    );
    Ok(setting)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let setting = run(&cli, Local::now().naive_local())?;
    println!(
        "Heater starts in {}h {:02}m",
        setting.offset_minutes / 60,
        setting.offset_minutes % 60
    );
    println!("Set heater clock to: {}", setting);
    Ok(())
}
