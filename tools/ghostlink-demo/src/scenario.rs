//! Scripted two-peer scenarios
//!
//! Both peers live in this process and talk over a [`LoopbackNetwork`]; each
//! frame ticks the host first, then the guest.

use anyhow::{Result, bail};
use clap::Args;
use ghostlink_core::{
    CoopConfig, CoopEvent, CoopSession, GhostUpdate, Interaction, JoinChoice, LoopbackNetwork,
    LoopbackTransport,
};
use ghostlink_shared::{EncounterId, GridPos, MapId};

use crate::world::DemoWorld;

/// Arguments for the walk scenario
#[derive(Args)]
pub struct WalkArgs {
    /// Guest destination, x
    #[arg(long, default_value_t = 6)]
    pub x: i32,

    /// Guest destination, y
    #[arg(long, default_value_t = 3)]
    pub y: i32,

    /// Frames the guest waits between player steps
    #[arg(long, default_value_t = 8)]
    pub step_frames: u32,

    /// Send the guest to another map halfway through
    #[arg(long)]
    pub change_map: bool,

    /// Frames to run
    #[arg(short, long, default_value_t = 180)]
    pub frames: u32,
}

/// Arguments for the battle-join scenario
#[derive(Args)]
pub struct BattleArgs {
    /// Encounter the host is fighting
    #[arg(long, default_value_t = 5)]
    pub troop: u32,

    /// Host leaves combat before the request arrives
    #[arg(long)]
    pub host_calm: bool,

    /// Frames to run after the request
    #[arg(short, long, default_value_t = 60)]
    pub frames: u32,
}

/// Arguments for the disconnect scenario
#[derive(Args)]
pub struct DisconnectArgs {
    /// Frames to run before the guest hangs up
    #[arg(short, long, default_value_t = 30)]
    pub frames: u32,
}

struct Peer {
    session: CoopSession<LoopbackTransport>,
    world: DemoWorld,
}

impl Peer {
    fn tick(&mut self) {
        for event in self.session.tick(&mut self.world) {
            report(self.world.name, &event);
        }
    }
}

/// Host and guest connected over loopback
struct Pair {
    host: Peer,
    guest: Peer,
    // Keeps the hub alive for the lifetime of the pair
    _network: LoopbackNetwork,
}

impl Pair {
    fn connect(config: &CoopConfig, host: DemoWorld, guest: DemoWorld) -> Result<Self> {
        let network = LoopbackNetwork::new();
        let mut pair = Self {
            host: Peer {
                session: CoopSession::new(config.clone(), network.transport_with_id("host")),
                world: host,
            },
            guest: Peer {
                session: CoopSession::new(config.clone(), network.transport()),
                world: guest,
            },
            _network: network,
        };

        pair.host.session.host()?;
        pair.host.tick();
        let Some(code) = pair.host.session.identity().cloned() else {
            bail!("host transport never became ready");
        };
        pair.guest.session.join(code.as_str())?;
        pair.frames(2);
        Ok(pair)
    }

    fn frames(&mut self, count: u32) {
        for _ in 0..count {
            self.host.tick();
            self.guest.tick();
        }
    }
}

fn report(world: &str, event: &CoopEvent) {
    match event {
        CoopEvent::Hosting { code } => tracing::info!(world, %code, "hosting, share this code"),
        CoopEvent::Connecting { code } => tracing::info!(world, %code, "connecting"),
        CoopEvent::PartnerConnected => tracing::info!(world, "partner connected"),
        CoopEvent::Connected => tracing::info!(world, "connected"),
        CoopEvent::ConnectionLost => tracing::warn!(world, "connection lost"),
        CoopEvent::JoinRequested => tracing::info!(world, "waiting for partner to answer"),
        CoopEvent::PartnerJoinedBattle { encounter, roster } => {
            tracing::info!(world, %encounter, ?roster, "partner joined the battle")
        }
        CoopEvent::JoinedEncounter { encounter, roster } => {
            tracing::info!(world, %encounter, ?roster, "joined partner's battle")
        }
    }
}

fn worlds(config: &CoopConfig) -> (DemoWorld, DemoWorld) {
    (
        DemoWorld::new("Aria", &config.ghost_marker, GridPos::new(0, 0), &[10, 11]),
        DemoWorld::new("Bram", &config.ghost_marker, GridPos::new(2, 1), &[20, 21]),
    )
}

/// Guest walks around; the host's ghost follows
pub fn walk(config: &CoopConfig, args: WalkArgs) -> Result<()> {
    let (host, guest) = worlds(config);
    let mut pair = Pair::connect(config, host, guest)?;
    let target = GridPos::new(args.x, args.y);
    let step_frames = args.step_frames.max(1);

    for frame in 0..args.frames {
        if args.change_map && frame == args.frames / 2 {
            tracing::info!("guest changes map");
            pair.guest.world.map = MapId(2);
        }
        if frame % step_frames == 0 {
            pair.guest.world.walk_toward(target);
        }
        pair.frames(1);

        if let Some(update) = pair.host.session.last_ghost_update() {
            if !matches!(update, GhostUpdate::Idle) {
                let ghost = &pair.host.world.ghost;
                tracing::debug!(frame, ?update, pos = ?ghost.pos, opacity = ghost.opacity, "host ghost");
            }
        }
    }

    let ghost = &pair.host.world.ghost;
    tracing::info!(
        guest = ?pair.guest.world.position,
        ghost = ?ghost.pos,
        opacity = ghost.opacity,
        heartbeats = pair.guest.session.heartbeats_sent(),
        "walk finished"
    );
    Ok(())
}

/// Guest asks to join the host's running battle
pub fn battle(config: &CoopConfig, args: BattleArgs) -> Result<()> {
    let (mut host, guest) = worlds(config);
    host.encounter = Some(EncounterId(args.troop));
    let mut pair = Pair::connect(config, host, guest)?;

    // Let the host's combat flag reach the guest
    pair.frames(config.sync_interval);
    if args.host_calm {
        tracing::info!("host leaves combat");
        pair.host.world.encounter = None;
    }

    match pair.guest.session.on_ghost_activated() {
        Interaction::Partner => {
            tracing::info!("partner is not fighting");
            return Ok(());
        }
        Interaction::JoinPrompt => {
            tracing::info!("partner is fighting, joining");
            pair.guest.session.choose(JoinChoice::Join)?;
        }
    }
    pair.frames(args.frames);

    tracing::info!(
        host_party = ?pair.host.world.party,
        guest_party = ?pair.guest.world.party,
        guest_encounter = ?pair.guest.world.encounter,
        handshake = ?pair.guest.session.handshake_state(),
        "battle finished"
    );
    Ok(())
}

/// Guest hangs up; both sides stop syncing
pub fn disconnect(config: &CoopConfig, args: DisconnectArgs) -> Result<()> {
    let (host, guest) = worlds(config);
    let mut pair = Pair::connect(config, host, guest)?;
    pair.frames(args.frames);

    pair.guest.session.disconnect();
    pair.frames(config.sync_interval * 2);

    tracing::info!(
        host = ?pair.host.session.connection_state(),
        guest = ?pair.guest.session.connection_state(),
        ghost_opacity = pair.host.world.ghost.opacity,
        "disconnect finished"
    );
    Ok(())
}
