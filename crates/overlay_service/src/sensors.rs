//! Sensor selection, registration and the worker thread shared by the
//! built-in sensor sources.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use contracts::{MotionSample, MotionSampleCallback, MotionSensorSource, SensorKind};
use tracing::{debug, info, warn};

/// Callback holder whose `clear` waits out an in-flight delivery
#[derive(Default)]
pub(crate) struct CallbackSlot(Mutex<Option<MotionSampleCallback>>);

impl CallbackSlot {
    pub(crate) fn new(callback: MotionSampleCallback) -> Self {
        Self(Mutex::new(Some(callback)))
    }

    /// Deliver a sample; false once cleared
    pub(crate) fn emit(&self, sample: MotionSample) -> bool {
        let guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(callback) => {
                callback(sample);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).take();
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

/// Handle passed to a sensor thread body
pub(crate) struct SampleEmitter {
    running: Arc<AtomicBool>,
    slot: Arc<CallbackSlot>,
}

impl SampleEmitter {
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub(crate) fn emit(&self, sample: MotionSample) -> bool {
        self.is_running() && self.slot.emit(sample)
    }

    /// Mark the session finished from inside the thread
    pub(crate) fn finish(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// One listen session of a threaded sensor
pub(crate) struct SensorWorker {
    running: Arc<AtomicBool>,
    slot: Arc<CallbackSlot>,
    _thread: JoinHandle<()>,
}

impl SensorWorker {
    pub(crate) fn spawn<F>(
        name: &str,
        callback: MotionSampleCallback,
        body: F,
    ) -> std::io::Result<Self>
    where
        F: FnOnce(SampleEmitter) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let slot = Arc::new(CallbackSlot::new(callback));
        let emitter = SampleEmitter {
            running: Arc::clone(&running),
            slot: Arc::clone(&slot),
        };

        let thread = thread::Builder::new()
            .name(format!("sensor-{name}"))
            .spawn(move || body(emitter))?;

        Ok(Self {
            running,
            slot,
            _thread: thread,
        })
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the session; no callback runs after this returns
    pub(crate) fn stop(self) {
        self.running.store(false, Ordering::SeqCst);
        self.slot.clear();
    }
}

/// Threaded sensor state: at most one live session
#[derive(Default)]
pub(crate) struct WorkerCell(Mutex<Option<SensorWorker>>);

impl WorkerCell {
    /// Start a session unless one is live
    pub(crate) fn start<F>(&self, name: &str, callback: MotionSampleCallback, body: F)
    where
        F: FnOnce(SampleEmitter) + Send + 'static,
    {
        let mut cell = self.0.lock().unwrap_or_else(|e| e.into_inner());
        if cell.as_ref().is_some_and(SensorWorker::is_running) {
            return;
        }
        if let Some(finished) = cell.take() {
            finished.stop();
        }

        match SensorWorker::spawn(name, callback, body) {
            Ok(worker) => *cell = Some(worker),
            Err(e) => warn!(sensor = name, error = %e, "failed to spawn sensor thread"),
        }
    }

    pub(crate) fn stop(&self) {
        if let Some(worker) = self.0.lock().unwrap_or_else(|e| e.into_inner()).take() {
            worker.stop();
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(SensorWorker::is_running)
    }
}

/// Pick the motion sensor to use
///
/// Prefers linear acceleration, falls back to the raw accelerometer.
pub fn select_sensor(
    candidates: impl IntoIterator<Item = Arc<dyn MotionSensorSource>>,
) -> Option<Arc<dyn MotionSensorSource>> {
    let mut fallback = None;
    for sensor in candidates {
        match sensor.kind() {
            SensorKind::LinearAcceleration => return Some(sensor),
            SensorKind::Accelerometer => {
                fallback.get_or_insert(sensor);
            }
        }
    }
    fallback
}

/// The lifecycle's hold on the motion sensor
///
/// Register and unregister are idempotent. Without a sensor every call is a
/// no-op: the overlay simply gets no motion cues.
pub struct SensorRegistration {
    sensor: Option<Arc<dyn MotionSensorSource>>,
    registered: bool,
}

impl SensorRegistration {
    pub fn new(sensor: Option<Arc<dyn MotionSensorSource>>) -> Self {
        if sensor.is_none() {
            info!("no motion sensor available, overlay will stay static");
        }
        Self {
            sensor,
            registered: false,
        }
    }

    /// Returns true if this call registered the callback
    pub fn register(&mut self, callback: &MotionSampleCallback) -> bool {
        let Some(sensor) = &self.sensor else {
            return false;
        };
        if self.registered {
            return false;
        }

        sensor.listen(Arc::clone(callback));
        self.registered = true;
        observability::record_sensor_registered(true);
        debug!(sensor = sensor.name(), kind = ?sensor.kind(), "sensor registered");
        true
    }

    /// Returns true if this call revoked a registration
    pub fn unregister(&mut self) -> bool {
        if !self.registered {
            return false;
        }
        if let Some(sensor) = &self.sensor {
            sensor.stop();
            debug!(sensor = sensor.name(), "sensor unregistered");
        }
        self.registered = false;
        observability::record_sensor_registered(false);
        true
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn has_sensor(&self) -> bool {
        self.sensor.is_some()
    }

    pub fn sensor_name(&self) -> Option<&str> {
        self.sensor.as_deref().map(|s| s.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualMotionSensor;

    fn noop() -> MotionSampleCallback {
        Arc::new(|_: MotionSample| {})
    }

    #[test]
    fn test_select_prefers_linear() {
        let accel: Arc<dyn MotionSensorSource> =
            Arc::new(ManualMotionSensor::new("accel", SensorKind::Accelerometer));
        let linear: Arc<dyn MotionSensorSource> =
            Arc::new(ManualMotionSensor::new("linear", SensorKind::LinearAcceleration));

        let picked = select_sensor([Arc::clone(&accel), Arc::clone(&linear)]).unwrap();
        assert_eq!(picked.name(), "linear");

        let picked = select_sensor([accel]).unwrap();
        assert_eq!(picked.name(), "accel");

        assert!(select_sensor(Vec::<Arc<dyn MotionSensorSource>>::new()).is_none());
    }

    #[test]
    fn test_registration_idempotent() {
        let sensor = Arc::new(ManualMotionSensor::new("m", SensorKind::Accelerometer));
        let mut registration = SensorRegistration::new(Some(sensor.clone()));

        assert!(registration.register(&noop()));
        assert!(!registration.register(&noop()));
        assert_eq!(sensor.listen_count(), 1);

        assert!(registration.unregister());
        assert!(!registration.unregister());
        assert!(!sensor.is_listening());
    }

    #[test]
    fn test_registration_without_sensor() {
        let mut registration = SensorRegistration::new(None);
        assert!(!registration.register(&noop()));
        assert!(!registration.is_registered());
        assert!(!registration.unregister());
    }

    #[test]
    fn test_slot_clear_stops_delivery() {
        let slot = CallbackSlot::new(noop());
        assert!(slot.emit(MotionSample::planar(SensorKind::Accelerometer, 0.0, 1.0, 1.0)));
        slot.clear();
        assert!(!slot.is_set());
        assert!(!slot.emit(MotionSample::planar(SensorKind::Accelerometer, 0.0, 1.0, 1.0)));
    }
}
