/// Session: one running campaign.
///
/// Owns the level set, the working board for the current level, and the
/// player/boss snapshots. The boards inside `Levels` stay pristine; play
/// happens on a per-level clone that is discarded on level change — so
/// re-entering a level restores its coins, and walking back into the
/// boss vault respawns the boss at full health.
///
/// One call to `turn` is one processed input event. Events are derived
/// by diffing the snapshots around the transition, which keeps the
/// transition functions themselves presentation-free.

use crate::domain::board::Board;
use crate::domain::boss::BossState;
use crate::domain::tile::TileKind;
use super::event::GameEvent;
use super::level::{LevelError, Levels};
use super::player::{final_level_update, update, Move, PlayerState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    Victory,
}

pub struct Session {
    pub levels: Levels,
    /// Working copy of the current level's board.
    pub board: Board,
    pub player: PlayerState,
    /// Present only while the current level is the final one.
    pub boss: Option<BossState>,
    pub phase: Phase,
    pub message: String,
    pub message_timer: u32,
    boss_health: u32,
    contact_damage: u32,
}

impl Session {
    pub fn new(levels: Levels, boss_health: u32, contact_damage: u32) -> Session {
        let player = PlayerState::initial(&levels);
        let board = levels.first().board.clone();
        let boss = Session::boss_for(&levels, player.level, boss_health);
        Session {
            levels,
            board,
            player,
            boss,
            phase: Phase::Title,
            message: String::new(),
            message_timer: 0,
            boss_health,
            contact_damage,
        }
    }

    fn boss_for(levels: &Levels, id: i32, health: u32) -> Option<BossState> {
        if !levels.is_final(id).ok()? {
            return None;
        }
        let lv = levels.level(id).ok()?;
        let at = lv.boss_spawn?;
        Some(BossState::new(at.x, at.y, lv.board.get(at).kind, health))
    }

    /// Leave the title screen and start playing.
    pub fn start(&mut self) {
        self.phase = Phase::Playing;
        let name = self.current_level_name();
        self.set_message(&name, 40);
    }

    pub fn current_level_name(&self) -> String {
        self.levels
            .level(self.player.level)
            .map(|lv| lv.name.clone())
            .unwrap_or_default()
    }

    /// Advance one turn. `None` is an unrecognized key (still a step).
    pub fn turn(&mut self, input: Option<Move>) -> Result<Vec<GameEvent>, LevelError> {
        let mut events = Vec::new();
        if self.phase != Phase::Playing {
            return Ok(events);
        }

        let before = self.player;

        // Peek the destination so pickups/warps can be reported after the
        // transition has consumed them.
        let peek = input.and_then(|mv| {
            let (dx, dy) = mv.delta();
            let dest = before.pos.offset(dx, dy);
            dest.in_bounds().then(|| (dest, self.board.get(dest).kind))
        });

        let after = match self.boss {
            Some(boss) => {
                let (p, b) = final_level_update(
                    input,
                    &before,
                    &self.levels,
                    &mut self.board,
                    &boss,
                    self.contact_damage,
                )?;
                if b.health < boss.health {
                    events.push(GameEvent::BossStruck { remaining: b.health });
                }
                self.boss = Some(b);
                p
            }
            None => update(input, &before, &self.levels, &mut self.board)?,
        };

        match peek {
            Some((_, TileKind::Coin)) if after.coins > before.coins => {
                events.push(GameEvent::CoinPicked { at: after.pos });
                let swept = self.board.iter().all(|t| t.kind != TileKind::Coin);
                if swept {
                    events.push(GameEvent::AllCoinsCollected { id: before.level });
                    self.set_message("sector swept clean", 30);
                }
            }
            Some((dest, TileKind::Item)) if after.level == before.level && after.pos == dest => {
                events.push(GameEvent::ItemPicked { at: dest });
                self.set_message("charge cell secured", 30);
            }
            Some((dest, kind @ TileKind::Pipe { color, .. })) if after.pos == kind.pipe_end() => {
                events.push(GameEvent::Warped { color, from: dest, to: after.pos });
            }
            _ => {}
        }

        self.player = after;
        if after.level != before.level {
            self.enter_level(after.level);
            events.push(GameEvent::LevelEntered { id: after.level });
        }

        if let Some(b) = self.boss {
            if b.is_defeated() {
                self.phase = Phase::Victory;
                events.push(GameEvent::BossDefeated);
            }
        }

        Ok(events)
    }

    /// Reset the current level: fresh board clone, player on the spawn,
    /// boss (if any) back at full health. Coins and steps ride along;
    /// re-collecting the restored coins is the arcade-restart tradeoff.
    pub fn restart_level(&mut self) {
        if let Ok(lv) = self.levels.level(self.player.level) {
            self.board = lv.board.clone();
            self.player.pos = lv.spawn;
            self.player.tile = lv.board.get(lv.spawn).kind;
            self.boss = Session::boss_for(&self.levels, lv.id, self.boss_health);
            let name = lv.name.clone();
            self.set_message(&format!("{} restarted", name), 30);
        }
    }

    /// Debug warp straight to the final level's spawn, steps intact.
    pub fn warp_to_final(&mut self) {
        self.player = PlayerState::at_final(&self.levels, self.player.steps);
        self.enter_level(self.player.level);
    }

    fn enter_level(&mut self, id: i32) {
        if let Ok(lv) = self.levels.level(id) {
            self.board = lv.board.clone();
            self.boss = Session::boss_for(&self.levels, id, self.boss_health);
            let name = lv.name.clone();
            self.set_message(&name, 40);
        }
    }

    // ── HUD message ──

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Called once per render tick (not per turn) by the main loop.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::{Coord, Room};
    use crate::domain::tile::Orientation;
    use crate::sim::level::{embedded_campaign, LevelDef};

    fn session() -> Session {
        let mut s = Session::new(Levels::from_defs(&embedded_campaign()), 100, 25);
        s.start();
        s
    }

    fn walk(s: &mut Session, moves: &[Move]) -> Vec<GameEvent> {
        let mut all = vec![];
        for &mv in moves {
            all.extend(s.turn(Some(mv)).expect("turn failed"));
        }
        all
    }

    #[test]
    fn title_phase_ignores_turns() {
        let mut s = Session::new(Levels::from_defs(&embedded_campaign()), 100, 25);
        let events = s.turn(Some(Move::Up)).unwrap();
        assert!(events.is_empty());
        assert_eq!(s.player.steps, 0);
    }

    #[test]
    fn coin_pickup_emits_an_event() {
        let mut s = session();
        // Spawn (1,1), around the corner and up onto the coin at (3,3).
        let events = walk(&mut s, &[Move::Right, Move::Right, Move::Up, Move::Up]);
        assert_eq!(s.player.pos, Coord::new(3, 3));
        assert_eq!(s.player.coins, 1);
        assert!(matches!(events.last(), Some(GameEvent::CoinPicked { .. })));
    }

    #[test]
    fn reentering_a_level_restores_its_coins() {
        let mut s = session();
        walk(&mut s, &[Move::Right, Move::Right, Move::Up, Move::Up]);
        assert_eq!(s.player.coins, 1);
        assert_eq!(s.board.get(Coord::new(3, 3)).kind, TileKind::Empty);

        // Walk to the exit at (15,8): over to x=14, up to y=8, through.
        let mut path = vec![Move::Down, Move::Down]; // back to (3,1)
        path.extend([Move::Right; 11]);              // (14,1)
        path.extend([Move::Up; 7]);                  // (14,8)
        path.push(Move::Right);                      // exit door
        walk(&mut s, &path);
        assert_eq!(s.player.level, 1);

        // Back through the entrance: the fresh clone has the coin again.
        let back = walk(&mut s, &[Move::Right, Move::Left, Move::Left]);
        assert_eq!(s.player.level, 0);
        assert!(back.iter().any(|e| matches!(e, GameEvent::LevelEntered { id: 0 })));
        assert_eq!(s.board.get(Coord::new(3, 3)).kind, TileKind::Coin);
        // The running count is the player's own; it does not roll back.
        assert_eq!(s.player.coins, 1);
    }

    #[test]
    fn level_change_swaps_board_and_announces() {
        let mut s = session();
        let mut path: Vec<Move> = vec![];
        path.extend([Move::Right; 13]);  // (14,1)
        path.extend([Move::Up; 7]);      // (14,8)
        path.push(Move::Right);          // through the exit
        let events = walk(&mut s, &path);
        assert_eq!(s.player.level, 1);
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelEntered { id: 1 })));
        assert_eq!(s.message, "Filter Gallery");
    }

    // ── Boss endgame ──

    /// Tiny two-level campaign whose final level holds the boss right
    /// next to the spawn, for quick defeat tests.
    fn duel(boss_health: u32, damage: u32) -> Session {
        let lead = LevelDef {
            name: "Lead-in".to_string(),
            spawn: Coord::new(1, 1),
            entrance: (Coord::new(0, 0), Orientation::Right),
            exit: (Coord::new(15, 8), Orientation::Right),
            rooms: vec![Room::new(Coord::new(1, 1), Coord::new(14, 14))],
            pipes: vec![],
            coins: vec![],
            items: vec![],
            boss: None,
        };
        let vault = LevelDef {
            name: "Vault".to_string(),
            spawn: Coord::new(4, 8),
            entrance: (Coord::new(0, 8), Orientation::Left),
            exit: (Coord::new(15, 15), Orientation::Up),
            rooms: vec![Room::new(Coord::new(1, 1), Coord::new(14, 14))],
            pipes: vec![],
            coins: vec![],
            items: vec![],
            boss: Some(Coord::new(7, 8)),
        };
        let mut s = Session::new(Levels::from_defs(&[lead, vault]), boss_health, damage);
        s.start();
        s.warp_to_final();
        s
    }

    #[test]
    fn adjacency_strike_reports_remaining_health() {
        let mut s = duel(100, 25);
        // Player (4,8) → (5,8); boss (7,8) → (6,8): adjacent, one strike.
        let events = walk(&mut s, &[Move::Right]);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::BossStruck { remaining: 75 })));
        assert_eq!(s.phase, Phase::Playing);
    }

    #[test]
    fn boss_defeat_wins_the_session() {
        let mut s = duel(20, 25);
        let events = walk(&mut s, &[Move::Right]);
        assert!(events.iter().any(|e| matches!(e, GameEvent::BossDefeated)));
        assert_eq!(s.phase, Phase::Victory);
    }

    #[test]
    fn restart_respawns_board_player_and_boss() {
        let mut s = duel(100, 25);
        walk(&mut s, &[Move::Right]); // boss down to 75
        s.restart_level();
        assert_eq!(s.player.pos, Coord::new(4, 8));
        let boss = s.boss.expect("final level keeps a boss");
        assert_eq!(boss.health, 100);
        assert_eq!(boss.pos, Coord::new(7, 8));
    }
}
