use crate::error::{Error, ParseError};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, ParseError>;

/// Returns true (and advances) if the next token is any of the given types.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser building the AST from a token stream.
///
/// - Program      -> Declaration* EOF ;
/// - Declaration  -> ClassDecl | FuncDecl | LetDecl | Statement ;
/// - ClassDecl    -> "class" IDENTIFIER ( "extends" IDENTIFIER )? "{" ( LetDecl | FuncDecl )* "}" ;
/// - FuncDecl     -> "func" Function ;
/// - LetDecl      -> "let" IDENTIFIER ( "=" Expression )? ";" ;
/// - Function     -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters   -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement    -> ExprStmt | ForStmt | IfStmt | PrintStmt | RetStmt | WhileStmt | Block ;
/// - ExprStmt     -> Expression ";" ;
/// - ForStmt      -> "for" "(" ( LetDecl | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt       -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt    -> "print" "(" Expression ")" ";" ;
/// - RetStmt      -> "ret" Expression? ";" ;
/// - WhileStmt    -> "while" "(" Expression ")" Statement ;
/// - Expression   -> Assignment ;
/// - Assignment   -> ( Call "." )? IDENTIFIER "=" Assignment | LogicOr ;
/// - LogicOr      -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd     -> Equality ( "and" Equality )* ;
/// - Equality     -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison   -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term         -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor       -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary        -> ( "!" | "-" ) Unary | Call ;
/// - Call         -> Primary ( "(" Arguments? ")" | "." IDENTIFIER )* ;
/// - Arguments    -> Expression ( "," Expression )* ;
/// - Primary      -> NUMBER | STRING | "false" | "true" | "nil" | "input" "(" ")"
///                  | "super" "." IDENTIFIER | "this" | IDENTIFIER
///                  | "(" Expression ( "," Expression )* ")" ;
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    next_id: NodeId,
}

impl Parser {
    /// `first_id` is the first [`NodeId`] this parser should hand out. A
    /// REPL session must pass the highest id seen so far plus one so that
    /// nodes from earlier lines — whose closures may still be alive and
    /// registered in the interpreter's locals table — never collide with
    /// nodes parsed on a later line.
    pub fn new(tokens: Vec<Token>, first_id: NodeId) -> Self {
        Parser { tokens, current: 0, next_id: first_id }
    }

    fn next_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The id that would be handed out next, i.e. one past every id this
    /// parser has actually produced. Callers driving multiple parses over
    /// a shared node-id space (the REPL) feed this back in as the next
    /// parser's `first_id`.
    pub fn next_available_id(&self) -> NodeId {
        self.next_id
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::Eof
    }

    fn check(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<&Token> {
        if self.check(r#type) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let statement = if matches!(self, Type::Class) {
            self.class_declaration()
        } else if matches!(self, Type::Func) {
            self.function("function")
        } else if matches!(self, Type::Let) {
            self.let_declaration()
        } else {
            self.statement()
        };

        match statement {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                error.throw();
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name.")?.clone();

        let superclass = if matches!(self, Type::Extends) {
            self.consume(Type::Identifier, "Expect superclass name.")?;
            Some(Expr::Variable(VariableData { id: self.next_id(), name: self.previous().clone() }))
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut fields = vec![];
        let mut methods = vec![];
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if matches!(self, Type::Let) {
                let Stmt::Let(data) = self.let_declaration()? else { unreachable!() };
                fields.push(data);
            } else if matches!(self, Type::Func) {
                let Stmt::Function(data) = self.function("method")? else { unreachable!() };
                methods.push(data);
            } else {
                return Err(ParseError {
                    token: self.peek().clone(),
                    message: format!("Unexpected token '{}'.", self.peek().lexeme),
                });
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassData { name, superclass, fields, methods }))
    }

    fn let_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?.clone();

        let mut initializer = None;
        if matches!(self, Type::Equal) {
            initializer = Some(self.expression()?);
        }

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Let(LetData { name, initializer }))
    }

    fn function(&mut self, kind: &str) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name."))?.clone();

        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = vec![];
        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 parameters.".to_string(),
                    }.throw();
                }

                params.push(self.consume(Type::Identifier, "Expect parameter name.")?.clone());

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }
        self.consume(Type::RightParen, "Expect ')' after parameters.")?;

        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;
        let body = self.block()?;

        Ok(Stmt::Function(FunctionData { name, params, body }))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self, Type::For) {
            return self.for_statement();
        }
        if matches!(self, Type::If) {
            return self.if_statement();
        }
        if matches!(self, Type::Print) {
            return self.print_statement();
        }
        if matches!(self, Type::Ret) {
            return self.return_statement();
        }
        if matches!(self, Type::While) {
            return self.while_statement();
        }
        if matches!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(BlockData { statements: self.block()? }));
        }

        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if matches!(self, Type::Semicolon) {
            None
        } else if matches!(self, Type::Let) {
            Some(self.let_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(Type::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            });
        }

        body = Stmt::While(WhileData {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if matches!(self, Type::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(IfData { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' before function call.")?;
        let expr = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after function call.")?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;

        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if !self.check(Type::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = self.statement()?;

        Ok(Stmt::While(WhileData { condition, body: Box::new(body) }))
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if matches!(self, Type::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return Ok(match expr {
                Expr::Variable(data) => Expr::Assign(AssignData {
                    id: self.next_id(),
                    name: data.name,
                    value: Box::new(value),
                }),
                Expr::Get(data) => Expr::Set(SetData {
                    object: data.object,
                    name: data.name,
                    value: Box::new(value),
                }),
                other => {
                    ParseError { token: equals, message: "Invalid assignment target.".to_string() }.throw();
                    other
                }
            });
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while matches!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while matches!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while matches!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while matches!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::Bang, Type::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryData { operator, expr: Box::new(right) }));
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 arguments.".to_string(),
                    }.throw();
                }

                arguments.push(self.expression()?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?.clone();

        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, Type::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if matches!(self, Type::Dot) {
                let name = self.consume(Type::Identifier, "Expect property name after '.'.")?.clone();
                expr = Expr::Get(GetData { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn input_expr(&mut self) -> ParseResult<Expr> {
        let keyword = self.previous().clone();
        self.consume(Type::LeftParen, "Expect '(' before function call.")?;
        self.consume(Type::RightParen, "Expect ')' after function call.")?;
        Ok(Expr::Input(InputData { keyword }))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }
        if matches!(self, Type::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }
        if matches!(self, Type::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if matches!(self, Type::Number, Type::String) {
            return Ok(Expr::Literal(
                self.previous().literal.clone().expect("number or string token to carry a literal"),
            ));
        }
        if matches!(self, Type::Input) {
            return self.input_expr();
        }
        if matches!(self, Type::Super) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(Type::Identifier, "Expect superclass method name.")?.clone();
            return Ok(Expr::Super(SuperData { id: self.next_id(), keyword, method }));
        }
        if matches!(self, Type::This) {
            return Ok(Expr::This(ThisData { id: self.next_id(), keyword: self.previous().clone() }));
        }
        if matches!(self, Type::Identifier) {
            return Ok(Expr::Variable(VariableData { id: self.next_id(), name: self.previous().clone() }));
        }

        if matches!(self, Type::LeftParen) {
            let first = self.expression()?;

            if matches!(self, Type::Comma) {
                let mut exprs = vec![first];
                let mut last = self.expression()?;
                while matches!(self, Type::Comma) {
                    exprs.push(last);
                    last = self.expression()?;
                }
                self.consume(Type::RightParen, "Expect ')' after expression.")?;
                return Ok(Expr::Comma(CommaData { exprs, last: Box::new(last) }));
            }

            self.consume(Type::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(GroupingData { expr: Box::new(first) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression.".to_string() })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class
                | Type::Func
                | Type::Const
                | Type::Let
                | Type::For
                | Type::If
                | Type::While
                | Type::Print
                | Type::Ret => return,
                _ => {
                    self.advance();
                }
            };
        }
    }
}
