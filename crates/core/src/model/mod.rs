mod ids;
mod modules;
mod practice;
mod quiz;
mod session;

pub use ids::LearnerId;
pub use modules::{
    ModuleName, ModuleUpdate, MultiplicationProgress, MultiplicationUpdate, NumberPlacesProgress,
    NumberPlacesUpdate, QuizProgress, QuizUpdate, SightWordsProgress, SightWordsUpdate,
    StackedMathProgress, StackedMathUpdate, UnknownModule,
};
pub use practice::{PracticeOutcome, PracticeRecord};
pub use quiz::{Quiz, QuizError, QuizPhase, QuizProblem, QuizScore};
pub use session::{LessonVisit, SessionState, SessionStateUpdate};
