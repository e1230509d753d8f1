//! Run statistics.

use std::time::Duration;

use overlay_service::ServiceReport;

/// Statistics from an overlay run
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Selected sensor, if any
    pub sensor: Option<String>,

    /// Frames the window host presented
    pub frames_drawn: u64,

    /// Most windows attached at once
    pub max_attached: usize,

    /// Attach/detach events recorded by the host
    pub window_events: usize,

    /// Service report
    pub report: ServiceReport,
}

impl RunStats {
    /// Presented frames per second
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_drawn as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Overlay Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!(
            "   ├─ Sensor: {}",
            self.sensor.as_deref().unwrap_or("(none)")
        );
        match self.report.last_mode {
            Some(mode) => println!("   ├─ Final mode: {}", mode),
            None => println!("   ├─ Final mode: (no surface)"),
        }
        println!("   ├─ Frames drawn: {}", self.frames_drawn);
        println!("   ├─ FPS: {:.2}", self.fps());
        println!("   ├─ Window events: {}", self.window_events);
        println!("   └─ Max windows attached: {}", self.max_attached);

        let engine = &self.report.engine;
        println!("\n📈 Motion Engine");
        println!("   ├─ Received: {}", engine.received);
        println!("   ├─ Forwarded: {}", engine.forwarded);
        println!("   ├─ Malformed: {}", engine.malformed);
        println!("   ├─ Stationary: {}", engine.stationary);
        println!("   ├─ Throttled: {}", engine.throttled);
        println!("   └─ Without surface: {}", engine.no_surface);

        println!("\n{}", self.report.summary);
    }
}
