//! Controller programs: a flat token stream interpreted by a boolean stack machine.
//!
//! The stack starts with the robot's sensor readings. Operators consume and
//! push booleans; the first move token reached is the program's answer.
//!
//! `IF` pops a condition and picks one of the two live tokens that follow it:
//! on `true` the first runs and the second is discarded, on `false` the first
//! is discarded. Discarded tokens stay out of the stream for the rest of the
//! evaluation, so a nested `IF` chooses among whatever is still live.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, ProgramError};

/// Terminal symbols: what the robot does this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum MoveCode {
    Forward,
    Left,
    Right,
}

impl MoveCode {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveCode::Forward => "FORWARD",
            MoveCode::Left => "LEFT",
            MoveCode::Right => "RIGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    If,
    Not,
    And,
    Or,
    Nop,
}

impl OpCode {
    pub fn as_str(self) -> &'static str {
        match self {
            OpCode::If => "IF",
            OpCode::Not => "NOT",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Nop => "NOP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub enum Token {
    Op(OpCode),
    Move(MoveCode),
}

impl Token {
    pub const IF: Token = Token::Op(OpCode::If);
    pub const NOT: Token = Token::Op(OpCode::Not);
    pub const AND: Token = Token::Op(OpCode::And);
    pub const OR: Token = Token::Op(OpCode::Or);
    pub const NOP: Token = Token::Op(OpCode::Nop);
    pub const FORWARD: Token = Token::Move(MoveCode::Forward);
    pub const LEFT: Token = Token::Move(MoveCode::Left);
    pub const RIGHT: Token = Token::Move(MoveCode::Right);

    /// Case-insensitive lookup by token name.
    pub fn from_name(name: &str) -> Option<Self> {
        let token = match name.to_ascii_uppercase().as_str() {
            "IF" => Token::IF,
            "NOT" => Token::NOT,
            "AND" => Token::AND,
            "OR" => Token::OR,
            "NOP" => Token::NOP,
            "FORWARD" => Token::FORWARD,
            "LEFT" => Token::LEFT,
            "RIGHT" => Token::RIGHT,
            _ => return None,
        };
        Some(token)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Token::Op(op) => op.as_str(),
            Token::Move(m) => m.as_str(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.as_str().to_string()
    }
}

impl TryFrom<String> for Token {
    type Error = ProgramError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Token::from_name(&name).ok_or(ProgramError::UnknownToken {
            token: name,
            index: 0,
        })
    }
}

impl From<MoveCode> for Token {
    fn from(m: MoveCode) -> Self {
        Token::Move(m)
    }
}

impl From<OpCode> for Token {
    fn from(op: OpCode) -> Self {
        Token::Op(op)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Program {
    tokens: Vec<Token>,
}

impl Program {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Run the program against `stack` (top of stack is the last element).
    pub fn evaluate(&self, mut stack: Vec<bool>) -> Result<MoveCode, EvalError> {
        let tokens = &self.tokens;
        let mut discarded = vec![false; tokens.len()];
        let mut cursor = 0;

        while let Some(at) = next_live(&discarded, cursor) {
            cursor = at + 1;
            match tokens[at] {
                Token::Move(m) => return Ok(m),
                Token::Op(OpCode::Nop) => {}
                Token::Op(OpCode::Not) => {
                    let op1 = pop(&mut stack, at)?;
                    stack.push(!op1);
                }
                Token::Op(OpCode::And) => {
                    let op1 = pop(&mut stack, at)?;
                    let op2 = pop(&mut stack, at)?;
                    stack.push(op1 && op2);
                }
                Token::Op(OpCode::Or) => {
                    let op1 = pop(&mut stack, at)?;
                    let op2 = pop(&mut stack, at)?;
                    stack.push(op1 || op2);
                }
                Token::Op(OpCode::If) => {
                    let cond = pop(&mut stack, at)?;
                    let Some(then_at) = next_live(&discarded, cursor) else {
                        break;
                    };
                    if cond {
                        if let Some(else_at) = next_live(&discarded, then_at + 1) {
                            discarded[else_at] = true;
                        }
                    } else {
                        discarded[then_at] = true;
                    }
                }
            }
        }

        Err(EvalError::NoMove)
    }
}

fn next_live(discarded: &[bool], from: usize) -> Option<usize> {
    (from..discarded.len()).find(|&i| !discarded[i])
}

fn pop(stack: &mut Vec<bool>, at: usize) -> Result<bool, EvalError> {
    stack.pop().ok_or(EvalError::StackUnderflow { at })
}

impl From<Vec<Token>> for Program {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl FromIterator<Token> for Program {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    /// Whitespace-separated token names, e.g. `"IF forward LEFT"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .enumerate()
            .map(|(index, name)| {
                Token::from_name(name).ok_or_else(|| ProgramError::UnknownToken {
                    token: name.to_string(),
                    index,
                })
            })
            .collect()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(text: &str) -> Program {
        text.parse().unwrap()
    }

    fn all_stacks() -> impl Iterator<Item = Vec<bool>> {
        (0u8..64).map(|bits| (0..6).map(|i| bits & (1 << i) != 0).collect())
    }

    #[test]
    fn lone_move_ignores_sensors() {
        let p = Program::new(vec![Token::FORWARD]);
        for stack in all_stacks() {
            assert_eq!(p.evaluate(stack), Ok(MoveCode::Forward));
        }
    }

    #[test]
    fn if_selects_between_the_next_two_tokens() {
        let p = program("IF FORWARD LEFT");
        assert_eq!(p.evaluate(vec![true]), Ok(MoveCode::Forward));
        assert_eq!(p.evaluate(vec![false]), Ok(MoveCode::Left));
    }

    #[test]
    fn if_pops_the_top_of_the_stack() {
        let p = program("IF RIGHT LEFT");
        assert_eq!(p.evaluate(vec![false, true]), Ok(MoveCode::Right));
        assert_eq!(p.evaluate(vec![true, false]), Ok(MoveCode::Left));
    }

    #[test]
    fn nested_if_sees_the_reduced_stream() {
        // Outer true discards RIGHT, so the inner IF picks between LEFT and FORWARD.
        let p = program("IF IF RIGHT LEFT FORWARD");
        assert_eq!(p.evaluate(vec![true, true]), Ok(MoveCode::Left));
        assert_eq!(p.evaluate(vec![false, true]), Ok(MoveCode::Forward));
        // Outer false discards the inner IF and lands on RIGHT.
        assert_eq!(p.evaluate(vec![true, false]), Ok(MoveCode::Right));
    }

    #[test]
    fn if_nop_nop_drops_one_value() {
        let p = program("IF NOP NOP IF FORWARD RIGHT");
        assert_eq!(p.evaluate(vec![true, false]), Ok(MoveCode::Forward));
        assert_eq!(p.evaluate(vec![true, true]), Ok(MoveCode::Forward));
        assert_eq!(p.evaluate(vec![false, true]), Ok(MoveCode::Right));
        assert_eq!(p.evaluate(vec![false, false]), Ok(MoveCode::Right));
    }

    #[test]
    fn boolean_operators() {
        let cases = [(false, false), (false, true), (true, false), (true, true)];
        for (a, b) in cases {
            let and = program("AND IF FORWARD LEFT").evaluate(vec![a, b]);
            let or = program("OR IF FORWARD LEFT").evaluate(vec![a, b]);
            let expect = |v: bool| Ok(if v { MoveCode::Forward } else { MoveCode::Left });
            assert_eq!(and, expect(a && b));
            assert_eq!(or, expect(a || b));
        }
        assert_eq!(program("NOT IF FORWARD LEFT").evaluate(vec![true]), Ok(MoveCode::Left));
        assert_eq!(program("NOT IF FORWARD LEFT").evaluate(vec![false]), Ok(MoveCode::Forward));
    }

    #[test]
    fn nop_only_program_has_no_move() {
        assert_eq!(program("NOP").evaluate(vec![]), Err(EvalError::NoMove));
        assert_eq!(Program::default().evaluate(vec![true; 6]), Err(EvalError::NoMove));
    }

    #[test]
    fn trailing_if_without_branches_has_no_move() {
        assert_eq!(program("IF").evaluate(vec![true]), Err(EvalError::NoMove));
        assert_eq!(program("IF").evaluate(vec![false]), Err(EvalError::NoMove));
        // True keeps the lone branch; false discards it.
        assert_eq!(program("IF LEFT").evaluate(vec![true]), Ok(MoveCode::Left));
        assert_eq!(program("IF LEFT").evaluate(vec![false]), Err(EvalError::NoMove));
    }

    #[test]
    fn popping_an_empty_stack_is_reported() {
        assert_eq!(
            program("NOP AND FORWARD").evaluate(vec![true]),
            Err(EvalError::StackUnderflow { at: 1 })
        );
        assert_eq!(
            program("IF FORWARD LEFT").evaluate(vec![]),
            Err(EvalError::StackUnderflow { at: 0 })
        );
    }

    #[test]
    fn evaluation_leaves_the_program_untouched() {
        let p = program("IF FORWARD LEFT");
        let before = p.clone();
        let _ = p.evaluate(vec![true]);
        let _ = p.evaluate(vec![false]);
        assert_eq!(p, before);
    }

    #[test]
    fn parses_case_insensitively_and_prints_upper_case() {
        let p = program("if Not\tand or nop\nforward left RIGHT");
        assert_eq!(p.len(), 8);
        assert_eq!(p.to_string(), "IF NOT AND OR NOP FORWARD LEFT RIGHT");
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            "IF JUMP LEFT".parse::<Program>(),
            Err(ProgramError::UnknownToken {
                token: "JUMP".to_string(),
                index: 1,
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_token_names() {
        let p = program("IF FORWARD LEFT");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"["IF","FORWARD","LEFT"]"#);
        let back: Program = serde_json::from_str(r#"["if","forward","left"]"#).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Program>(r#"["JUMP"]"#).is_err());
    }
}
