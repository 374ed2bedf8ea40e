//! Combat actor state machine
//!
//! ```text
//! Unoccupied ──attack──▶ Attacking ──swing end──▶ Unoccupied
//!      │                     │
//!      └──────damage─────────┴──▶ HitReacting ──react end──▶ Unoccupied
//! any ──damage, HP = 0──▶ Dead (terminal)
//! ```
//!
//! Состояние приватное: меняется только через методы перехода.
//! Недопустимый переход → `Err(TransitionRejected)`, состояние не меняется.
//! Side effects (анимация, hitbox'ы, таймеры) делают системы по результату перехода.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::{
    attack_section, classify_hit_direction, Attachment, AttackSwing, HitDirection, HitboxGroup,
    Montage, PlaybackId, SwingId,
};
use crate::components::Health;

/// Длина combo по умолчанию (Attack1..Attack3)
pub const DEFAULT_COMBO_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum ActionState {
    #[default]
    Unoccupied,
    Attacking,
    HitReacting,
    Dead,
}

/// Кто управляет поворотом актора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum OrientationMode {
    /// Поворот по направлению движения
    #[default]
    FollowMovement,
    /// Поворот зафиксирован (`Facing`), пока идёт атака
    ExplicitFacing,
}

/// Поза смерти (секция death montage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DeathPose {
    Flying,
    Standing,
}

impl DeathPose {
    pub const ALL: [DeathPose; 2] = [DeathPose::Flying, DeathPose::Standing];

    pub fn section(&self) -> &'static str {
        match self {
            DeathPose::Flying => "flying_death",
            DeathPose::Standing => "standing_death",
        }
    }
}

/// Счётчик combo: какая секция атаки следующая
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackSequence {
    next: usize,
    len: usize,
}

impl AttackSequence {
    pub fn new(len: usize) -> Self {
        Self { next: 0, len: len.max(1) }
    }

    pub fn combo_len(&self) -> usize {
        self.len
    }

    /// Индекс следующей атаки (без сдвига)
    pub fn peek(&self) -> usize {
        if self.next >= self.len {
            0
        } else {
            self.next
        }
    }

    /// Взять индекс и сдвинуть счётчик (wrap на длине combo)
    pub fn advance(&mut self) -> usize {
        let index = self.peek();
        self.next = index + 1;
        index
    }

    /// Combo дошло до конца → снова с Attack1
    pub fn reset_if_complete(&mut self) {
        if self.next >= self.len {
            self.next = 0;
        }
    }
}

impl Default for AttackSequence {
    fn default() -> Self {
        Self::new(DEFAULT_COMBO_LENGTH)
    }
}

/// Почему переход отклонён
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionRejected {
    #[error("actor is dead")]
    Dead,
    #[error("actor is busy ({0:?})")]
    Busy(ActionState),
    #[error("actor is not attacking ({0:?})")]
    NotAttacking(ActionState),
    #[error("actor is not hit reacting ({0:?})")]
    NotHitReacting(ActionState),
    #[error("attack variant {variant} is out of combo range (len {len})")]
    UnknownVariant { variant: usize, len: usize },
    #[error("stale playback {received:?} (current {current:?})")]
    StalePlayback {
        received: PlaybackId,
        current: Option<PlaybackId>,
    },
    #[error("{0:?} montage was interrupted")]
    Interrupted(Montage),
}

/// Успешный старт атаки
#[derive(Debug, Clone, PartialEq)]
pub struct SwingStart {
    pub swing: SwingId,
    pub variant: usize,
    pub section: String,
    pub playback: PlaybackId,
}

/// Откуда прилетел урон (для выбора hit reaction)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactGeometry {
    pub forward: Vec3,
    pub position: Vec3,
    pub impact_point: Vec3,
}

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    HitReact {
        applied: u32,
        direction: HitDirection,
        playback: PlaybackId,
    },
    Died {
        applied: u32,
        pose: DeathPose,
        playback: PlaybackId,
    },
}

impl DamageOutcome {
    pub fn applied(&self) -> u32 {
        match self {
            DamageOutcome::HitReact { applied, .. } | DamageOutcome::Died { applied, .. } => *applied,
        }
    }
}

/// Боевое состояние актора (общее для Player и AI)
#[derive(Component, Debug, Clone)]
pub struct CombatActor {
    state: ActionState,
    sequence: AttackSequence,
    swing: Option<AttackSwing>,
    swings_started: u64,
    playbacks_started: u64,
    /// Текущий playback (montage + токен), completion с другим токеном — stale
    playback: Option<(Montage, PlaybackId)>,
    orientation: OrientationMode,
    /// Группа hitbox'ов, включаемая на старте атаки
    attack_hitboxes: HitboxGroup,
    last_reaction: Option<HitDirection>,
    death_pose: Option<DeathPose>,
}

impl Default for CombatActor {
    fn default() -> Self {
        Self::new(DEFAULT_COMBO_LENGTH)
    }
}

impl CombatActor {
    pub fn new(combo_len: usize) -> Self {
        Self {
            state: ActionState::Unoccupied,
            sequence: AttackSequence::new(combo_len),
            swing: None,
            swings_started: 0,
            playbacks_started: 0,
            playback: None,
            orientation: OrientationMode::FollowMovement,
            attack_hitboxes: HitboxGroup::Limb,
            last_reaction: None,
            death_pose: None,
        }
    }

    pub fn with_attack_hitboxes(mut self, group: HitboxGroup) -> Self {
        self.attack_hitboxes = group;
        self
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == ActionState::Dead
    }

    pub fn orientation(&self) -> OrientationMode {
        self.orientation
    }

    pub fn sequence(&self) -> AttackSequence {
        self.sequence
    }

    pub fn attack_hitboxes(&self) -> HitboxGroup {
        self.attack_hitboxes
    }

    pub fn current_swing(&self) -> Option<&AttackSwing> {
        self.swing.as_ref()
    }

    pub fn current_playback(&self) -> Option<(Montage, PlaybackId)> {
        self.playback
    }

    pub fn last_reaction(&self) -> Option<HitDirection> {
        self.last_reaction
    }

    pub fn death_pose(&self) -> Option<DeathPose> {
        self.death_pose
    }

    /// Старт атаки. Только из Unoccupied.
    ///
    /// `variant` = явный индекс секции (счётчик combo не трогается),
    /// `None` = следующая секция combo.
    pub fn request_attack(
        &mut self,
        owner: Entity,
        variant: Option<usize>,
    ) -> Result<SwingStart, TransitionRejected> {
        match self.state {
            ActionState::Unoccupied => {}
            ActionState::Dead => return Err(TransitionRejected::Dead),
            other => return Err(TransitionRejected::Busy(other)),
        }

        let index = match variant {
            Some(variant) if variant < self.sequence.combo_len() => variant,
            Some(variant) => {
                return Err(TransitionRejected::UnknownVariant {
                    variant,
                    len: self.sequence.combo_len(),
                })
            }
            None => self.sequence.advance(),
        };

        let section = attack_section(index);
        let swing = self.start_swing(owner, section.clone());
        let playback = self.start_playback(Montage::Attack);

        self.state = ActionState::Attacking;
        self.orientation = OrientationMode::ExplicitFacing;

        Ok(SwingStart {
            swing,
            variant: index,
            section,
            playback,
        })
    }

    /// Новое hitbox окно внутри текущей атаки (chained combo): новый swing, пустой hit set
    pub fn begin_swing_window(&mut self, owner: Entity) -> Result<SwingId, TransitionRejected> {
        if self.state != ActionState::Attacking {
            return Err(TransitionRejected::NotAttacking(self.state));
        }

        let section = self
            .swing
            .as_ref()
            .map(|swing| swing.section().to_string())
            .unwrap_or_else(|| attack_section(0));

        Ok(self.start_swing(owner, section))
    }

    /// Hit registry текущего swing'а. false вне атаки.
    pub fn try_register_hit(&mut self, target: Entity, attachment: Attachment) -> bool {
        if self.state != ActionState::Attacking {
            return false;
        }
        self.swing
            .as_mut()
            .is_some_and(|swing| swing.try_register_hit(target, attachment))
    }

    /// Swing этой атаки ещё актуален?
    pub fn is_current_swing(&self, swing: SwingId) -> bool {
        self.state == ActionState::Attacking
            && self.swing.as_ref().is_some_and(|current| current.id() == swing)
    }

    /// Конец атаки: Unoccupied, swing уничтожен, ориентация по движению
    pub fn end_attack(&mut self) -> Result<(), TransitionRejected> {
        if self.state != ActionState::Attacking {
            return Err(TransitionRejected::NotAttacking(self.state));
        }

        self.state = ActionState::Unoccupied;
        self.swing = None;
        self.playback = None;
        self.orientation = OrientationMode::FollowMovement;
        self.sequence.reset_if_complete();
        Ok(())
    }

    /// Конец hit reaction → Unoccupied
    pub fn finish_hit_react(&mut self) -> Result<(), TransitionRejected> {
        if self.state != ActionState::HitReacting {
            return Err(TransitionRejected::NotHitReacting(self.state));
        }

        self.state = ActionState::Unoccupied;
        self.playback = None;
        self.orientation = OrientationMode::FollowMovement;
        Ok(())
    }

    /// Completion callback от анимации хоста.
    ///
    /// Токен должен совпадать с текущим playback. Прерванная атака не завершается:
    /// переход делает тот, кто прервал (hit react, смерть).
    pub fn finish_montage(
        &mut self,
        montage: Montage,
        playback: PlaybackId,
        interrupted: bool,
    ) -> Result<ActionState, TransitionRejected> {
        if self.state == ActionState::Dead {
            return Err(TransitionRejected::Dead);
        }

        match self.playback {
            Some((current_montage, current)) if current_montage == montage && current == playback => {}
            current => {
                return Err(TransitionRejected::StalePlayback {
                    received: playback,
                    current: current.map(|(_, id)| id),
                })
            }
        }

        match montage {
            Montage::Attack if interrupted => Err(TransitionRejected::Interrupted(montage)),
            Montage::Attack => self.end_attack().map(|_| self.state),
            Montage::HitReact => self.finish_hit_react().map(|_| self.state),
            Montage::Death => Err(TransitionRejected::Dead),
        }
    }

    /// Урон: HitReacting или Dead.
    ///
    /// Атака прерывается (swing уничтожается). Dead → Err, HP не трогается.
    pub fn apply_damage<R: Rng + ?Sized>(
        &mut self,
        health: &mut Health,
        amount: u32,
        impact: Option<ImpactGeometry>,
        rng: &mut R,
    ) -> Result<DamageOutcome, TransitionRejected> {
        if self.state == ActionState::Dead {
            return Err(TransitionRejected::Dead);
        }

        let applied = health.receive_damage(amount);

        self.swing = None;
        self.orientation = OrientationMode::FollowMovement;

        if !health.is_alive() {
            let pose = DeathPose::ALL[rng.gen_range(0..DeathPose::ALL.len())];
            self.state = ActionState::Dead;
            self.death_pose = Some(pose);
            let playback = self.start_playback(Montage::Death);
            return Ok(DamageOutcome::Died {
                applied,
                pose,
                playback,
            });
        }

        // Без точки удара (урон не от hitbox'а) → реакция спереди
        let direction = impact
            .map(|geometry| {
                classify_hit_direction(geometry.forward, geometry.position, geometry.impact_point)
            })
            .unwrap_or(HitDirection::Front);

        self.state = ActionState::HitReacting;
        self.last_reaction = Some(direction);
        let playback = self.start_playback(Montage::HitReact);

        Ok(DamageOutcome::HitReact {
            applied,
            direction,
            playback,
        })
    }

    fn start_swing(&mut self, owner: Entity, section: String) -> SwingId {
        self.swings_started += 1;
        let id = SwingId(self.swings_started);
        self.swing = Some(AttackSwing::new(id, owner, section));
        id
    }

    fn start_playback(&mut self, montage: Montage) -> PlaybackId {
        self.playbacks_started += 1;
        let id = PlaybackId(self.playbacks_started);
        self.playback = Some((montage, id));
        id
    }
}
