use log::{debug, warn};
use regex::Regex;

const STATUS_LINE_PATTERN: &str =
    r"^TPS: (?<tps>[0-9]+[.,][0-9]) MSPT: (?<mspt>[0-9]+[.,][0-9])$";

/// Target tick duration; anything at or below it runs at the full tick rate.
pub const TARGET_MS_PER_TICK: f64 = 50.0;
pub const TARGET_TICKS_PER_SECOND: f64 = 20.0;

/// Number of recent tick timings kept for direct measurement.
pub const TICK_TIME_SLOTS: usize = 100;

/// Source governing the current performance sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Averaged from the self-hosted simulation's own tick timings.
    DirectMeasurement,
    /// Estimated from the wall time between world-time heartbeats.
    ElapsedEstimate,
    /// Scraped from the peer's textual status line.
    TextScrape,
    /// Reported by the peer over the subscription channel.
    Subscription,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceSample {
    pub ms_per_tick: f64,
    pub ticks_per_second: f64,
    pub valid: bool,
    pub provenance: Option<Provenance>,
}

impl PerformanceSample {
    fn empty() -> Self {
        Self {
            ms_per_tick: 0.0,
            ticks_per_second: 0.0,
            valid: false,
            provenance: None,
        }
    }
}

impl Default for PerformanceSample {
    fn default() -> Self {
        Self::empty()
    }
}

/// Tick rate the simulation achieves when each tick takes `ms_per_tick`.
pub fn ticks_per_second_for(ms_per_tick: f64) -> f64 {
    if ms_per_tick <= TARGET_MS_PER_TICK {
        TARGET_TICKS_PER_SECOND
    } else {
        1000.0 / ms_per_tick
    }
}

/// Fixed ring of recent tick durations, in nanoseconds.
#[derive(Clone, Debug)]
pub struct TickTimeRing {
    slots: [i64; TICK_TIME_SLOTS],
    next: usize,
    filled: usize,
}

impl Default for TickTimeRing {
    fn default() -> Self {
        Self::new()
    }
}

impl TickTimeRing {
    pub fn new() -> Self {
        Self {
            slots: [0; TICK_TIME_SLOTS],
            next: 0,
            filled: 0,
        }
    }

    pub fn record(&mut self, nanos: i64) {
        self.slots[self.next] = nanos;
        self.next = (self.next + 1) % TICK_TIME_SLOTS;
        self.filled = (self.filled + 1).min(TICK_TIME_SLOTS);
    }

    /// Timings recorded so far, oldest slot order not preserved.
    pub fn as_slice(&self) -> &[i64] {
        &self.slots[..self.filled]
    }
}

/// Derives tick duration and tick rate from whichever source fired last.
pub struct PerformanceMonitor {
    sample: PerformanceSample,
    protocol_capable: bool,
    last_heartbeat: Option<(i64, u64)>,
    status_line: Option<Regex>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        let status_line = Regex::new(STATUS_LINE_PATTERN)
            .map_err(|error| warn!("Tick-rate status pattern failed to compile: {}", error))
            .ok();
        Self {
            sample: PerformanceSample::empty(),
            protocol_capable: false,
            last_heartbeat: None,
            status_line,
        }
    }

    pub fn sample(&self) -> PerformanceSample {
        self.sample
    }

    /// Whether the peer has shown it sends richer telemetry than heartbeats this session.
    pub fn is_protocol_capable(&self) -> bool {
        self.protocol_capable
    }

    pub fn mark_protocol_capable(&mut self) {
        self.protocol_capable = true;
    }

    fn switch_to(&mut self, provenance: Provenance) {
        if self.sample.provenance != Some(provenance) {
            self.sample.valid = false;
            self.sample.provenance = Some(provenance);
        }
    }

    fn set(&mut self, ms_per_tick: f64, ticks_per_second: f64) {
        self.sample.ms_per_tick = ms_per_tick;
        self.sample.ticks_per_second = ticks_per_second;
        self.sample.valid = true;
    }

    /// Self-hosted session: average the simulation's recent tick durations.
    pub fn update_direct(&mut self, tick_times_nanos: &[i64]) {
        if tick_times_nanos.is_empty() {
            return;
        }
        self.switch_to(Provenance::DirectMeasurement);

        let total: i128 = tick_times_nanos.iter().map(|nanos| i128::from(*nanos)).sum();
        let average_nanos = total as f64 / tick_times_nanos.len() as f64;
        let ms_per_tick = average_nanos / 1_000_000.0;
        self.set(ms_per_tick, ticks_per_second_for(ms_per_tick));
    }

    /// World-time heartbeat from a remote peer. Estimates the tick duration from the wall
    /// time elapsed since the previous heartbeat; the first heartbeat only sets the baseline.
    /// Does nothing once the peer is known to send richer telemetry.
    pub fn on_heartbeat(&mut self, world_tick: i64, now_nanos: u64) {
        if self.protocol_capable {
            return;
        }
        self.switch_to(Provenance::ElapsedEstimate);

        if let Some((last_tick, last_nanos)) = self.last_heartbeat {
            let elapsed_ticks = world_tick.saturating_sub(last_tick);
            if elapsed_ticks > 0 {
                let elapsed_nanos = now_nanos.saturating_sub(last_nanos) as f64;
                let ms_per_tick = elapsed_nanos / elapsed_ticks as f64 / 1_000_000.0;
                self.set(ms_per_tick, ticks_per_second_for(ms_per_tick));
            }
        }
        self.last_heartbeat = Some((world_tick, now_nanos));
    }

    /// Scan a status text for a `TPS: <rate> MSPT: <duration>` line. Formatting codes are
    /// stripped and the first matching line wins; no match invalidates the sample.
    pub fn on_status_text(&mut self, text: &str) -> bool {
        if let Some((tps, mspt)) = self.parse_status_text(text) {
            self.protocol_capable = true;
            self.switch_to(Provenance::TextScrape);
            self.set(mspt, tps);
            return true;
        }

        self.sample.valid = false;
        false
    }

    fn parse_status_text(&self, text: &str) -> Option<(f64, f64)> {
        let status_line = self.status_line.as_ref()?;
        let text = strip_formatting_codes(text);

        text.split('\n').find_map(|line| {
            let captures = status_line.captures(line)?;
            let tps = parse_decimal(captures.name("tps")?.as_str())?;
            let mspt = parse_decimal(captures.name("mspt")?.as_str())?;
            Some((tps, mspt))
        })
    }

    /// Values read from the subscription store; the sample is valid only when both arrived.
    pub fn on_subscription_refresh(&mut self, ticks_per_second: Option<f64>, ms_per_tick: Option<f64>) {
        self.protocol_capable = true;
        self.switch_to(Provenance::Subscription);

        if let Some(tps) = ticks_per_second {
            self.sample.ticks_per_second = tps;
        }
        if let Some(mspt) = ms_per_tick {
            self.sample.ms_per_tick = mspt;
        }
        self.sample.valid = ticks_per_second.is_some() && ms_per_tick.is_some();
        debug!("Performance sample from subscription: {:?}", self.sample);
    }

    /// Forget the sample, the heartbeat baseline and the peer's capabilities.
    pub fn reset(&mut self) {
        self.sample = PerformanceSample::empty();
        self.protocol_capable = false;
        self.last_heartbeat = None;
    }
}

fn parse_decimal(value: &str) -> Option<f64> {
    value.replace(',', ".").parse().ok()
}

/// Remove `§x` formatting codes.
pub fn strip_formatting_codes(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '§' {
            chars.next();
        } else {
            stripped.push(c);
        }
    }
    stripped
}
