//! Sound effects
//!
//! All sounds are optional assets under `assets/sounds/`; a missing file or
//! a missing audio device degrades to silence, never to a crash. The whole
//! system sits behind a mute toggle on the M key.

use std::collections::HashMap;

use kira::{
    Volume,
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::static_sound::{StaticSoundData, StaticSoundSettings},
};

use crate::sim::GameEvent;

/// Sound set: (name, file, volume)
const SOUNDS: &[(&str, &str, f32)] = &[
    ("jump", "assets/sounds/jump.ogg", 0.4),
    ("point", "assets/sounds/point.ogg", 0.3),
    ("bonus", "assets/sounds/bonus.ogg", 0.5),
    ("shot_ready", "assets/sounds/shot_ready.ogg", 0.5),
    ("shoot", "assets/sounds/shoot.ogg", 0.5),
    ("explosion", "assets/sounds/explosion.ogg", 0.6),
    ("hit", "assets/sounds/hit.ogg", 0.7),
];

pub struct AudioSystem {
    manager: Option<AudioManager>,
    sounds: HashMap<&'static str, StaticSoundData>,
    volumes: HashMap<&'static str, f32>,
    enabled: bool,
}

impl AudioSystem {
    /// Set up the audio device and load whatever sounds are present
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(manager) => Some(manager),
            Err(e) => {
                log::warn!("Audio unavailable, continuing silent: {e}");
                None
            }
        };

        let mut sounds = HashMap::new();
        let mut volumes = HashMap::new();
        if manager.is_some() {
            for &(name, path, volume) in SOUNDS {
                match StaticSoundData::from_file(path) {
                    Ok(data) => {
                        sounds.insert(name, data);
                        volumes.insert(name, volume);
                    }
                    Err(e) => log::warn!("Failed to load sound {name} ({path}): {e}"),
                }
            }
            log::info!("Loaded {}/{} sound effects", sounds.len(), SOUNDS.len());
        }

        Self {
            manager,
            sounds,
            volumes,
            enabled: true,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        log::info!("Sound {}", if self.enabled { "on" } else { "off" });
    }

    fn play(&mut self, name: &str) {
        if !self.enabled {
            return;
        }
        let Some(manager) = self.manager.as_mut() else {
            return;
        };
        if let Some(data) = self.sounds.get(name) {
            let volume = self.volumes.get(name).copied().unwrap_or(1.0);
            let mut settings = StaticSoundSettings::default();
            settings.volume = Volume::Amplitude(volume as f64).into();
            if let Err(e) = manager.play(data.clone().with_settings(settings)) {
                log::warn!("Failed to play {name}: {e}");
            }
        }
    }

    /// Map a simulation event to its sound, if it has one
    pub fn handle_event(&mut self, event: GameEvent) {
        let name = match event {
            GameEvent::Jumped => "jump",
            GameEvent::Scored => "point",
            GameEvent::BonusScored => "bonus",
            GameEvent::ShotAwarded => "shot_ready",
            GameEvent::Fired => "shoot",
            GameEvent::ObstacleShot => "explosion",
            GameEvent::Died => "hit",
            GameEvent::Restarted => return,
        };
        self.play(name);
    }
}
