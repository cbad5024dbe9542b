use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::UnknownPersona;

/// The character the assistant is asked to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Persona {
    #[default]
    Assistant,
    Counselor,
    Teacher,
    Artist,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Assistant,
        Persona::Counselor,
        Persona::Teacher,
        Persona::Artist,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Persona::Assistant => "Assistant",
            Persona::Counselor => "Counselor",
            Persona::Teacher => "Teacher",
            Persona::Artist => "Artist",
        }
    }

    /// The default role prompt sent as the system message for this persona.
    pub fn role_prompt(self) -> &'static str {
        match self {
            Persona::Assistant => "You are a helpful assistant.",
            Persona::Counselor => {
                "You are a counselor who provides effective solutions to user's problem with an empathetic tone."
            }
            Persona::Teacher => {
                "You are an understanding teacher who explains concepts user asks about with easy explanations. If possible, give analogies or useful examples. "
            }
            Persona::Artist => "You are a creative artist who provides innovative and creative ideas.",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Persona {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        <Persona as ValueEnum>::from_str(wanted, true).map_err(|_| UnknownPersona(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("teacher".parse::<Persona>().unwrap(), Persona::Teacher);
        assert_eq!(" ARTIST ".parse::<Persona>().unwrap(), Persona::Artist);
        let err = "pirate".parse::<Persona>().unwrap_err();
        assert_eq!(err.to_string(), "unknown persona 'pirate'");
    }

    #[test]
    fn test_default_is_assistant() {
        assert_eq!(Persona::default(), Persona::Assistant);
        assert_eq!(Persona::default().role_prompt(), "You are a helpful assistant.");
    }

    #[test]
    fn test_each_persona_has_distinct_prompt() {
        let prompts: Vec<_> = Persona::ALL.iter().map(|p| p.role_prompt()).collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in prompts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
