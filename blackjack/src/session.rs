use rand::rngs::StdRng;

use crate::{
    counting::CountingDrill,
    simulation::{
        shoe::{make_rng, ShoeError},
        view::RoundView,
        ActionError, Progress, Rank, Table, TableEventHandler,
    },
    statistics::SessionStatistics,
    strategy::{grade, BasicStrategy, HandDescriptor, MoveGrade, Recommendation, Strategy, UpCard},
    Decision, Rule, RuleError,
};

/// Everything one trainer run owns: the play table, its statistics, and the
/// counting drill.
pub struct Session {
    rule: Rule,
    table: Table,
    statistics: SessionStatistics,
    strategy: BasicStrategy,
    drill: Option<CountingDrill>,
    rng: StdRng,
}

impl Session {
    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        let table = Table::new(rule)?;
        log::debug!("new session with {:?}", rule);
        Ok(Session {
            rule: *rule,
            table,
            statistics: SessionStatistics::new(),
            strategy: BasicStrategy::new(),
            drill: None,
            // Drill deck seeded apart from the shoe.
            rng: make_rng(rule.seed.map(|seed| seed.wrapping_add(1))),
        })
    }

    /// Back to a fresh shoe, zeroed statistics and no drill.
    pub fn reset(&mut self) {
        log::debug!("session reset");
        self.table = Table::with_rule(&self.rule);
        self.statistics = SessionStatistics::new();
        self.drill = None;
    }

    /// Ends the session, handing back its final statistics.
    pub fn dispose(self) -> SessionStatistics {
        log::debug!("session closed after {} hands", self.statistics.hands_played);
        self.statistics
    }

    pub fn deal_new_hand<H: TableEventHandler>(&mut self, handler: &mut H) -> Progress {
        let progress = self.table.deal_new_hand(handler);
        self.record(&progress);
        progress
    }

    pub fn hit<H: TableEventHandler>(&mut self, handler: &mut H) -> Result<Progress, ActionError> {
        let progress = self.table.hit(handler)?;
        self.record(&progress);
        Ok(progress)
    }

    pub fn stand<H: TableEventHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<Progress, ActionError> {
        let progress = self.table.stand(handler)?;
        self.record(&progress);
        Ok(progress)
    }

    pub fn split<H: TableEventHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<Progress, ActionError> {
        let progress = self.table.split(handler)?;
        self.record(&progress);
        Ok(progress)
    }

    /// Basic strategy for the hand awaiting a decision, if any.
    pub fn hint(&self) -> Option<Recommendation> {
        let hand = self.table.current_descriptor()?;
        let up_card = self.table.up_card()?;
        Some(self.strategy.recommend(&hand, up_card))
    }

    pub fn advise(&self, hand: &HandDescriptor, dealer_up_card: UpCard) -> Recommendation {
        self.strategy.recommend(hand, dealer_up_card)
    }

    /// Grades a declared move against the chart.
    pub fn check_move(
        &self,
        hand: &HandDescriptor,
        dealer_up_card: UpCard,
        declared: Decision,
    ) -> MoveGrade {
        grade(declared, self.advise(hand, dealer_up_card))
    }

    /// Starts (or restarts) the counting drill with a freshly shuffled deck.
    pub fn start_drill(&mut self) -> &mut CountingDrill {
        let drill = CountingDrill::start(self.rule.drill_length, &mut self.rng);
        self.drill.insert(drill)
    }

    pub fn drill(&self) -> Option<&CountingDrill> {
        self.drill.as_ref()
    }

    pub fn drill_mut(&mut self) -> Option<&mut CountingDrill> {
        self.drill.as_mut()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Rebuilds the play shoe so that the given ranks are dealt first, in order.
    pub fn stack_shoe(&mut self, firsts: &[Rank]) -> Result<(), ShoeError> {
        self.table.stack_shoe(firsts)
    }

    pub fn statistics(&self) -> &SessionStatistics {
        &self.statistics
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn view(&self) -> RoundView {
        self.table.view()
    }

    fn record(&mut self, progress: &Progress) {
        if let Progress::Resolved(outcomes) = progress {
            self.statistics.record_round(outcomes);
        }
    }
}
