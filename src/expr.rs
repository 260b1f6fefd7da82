use crate::literal::Literal;
use crate::token::Token;

/// Stable identity for an expression node, assigned once by the parser.
/// The resolver and interpreter key their side tables by this instead of
/// by token or by structural equality, so two syntactically identical
/// expressions at different source positions never collide.
pub type NodeId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct AssignData {
    pub id: NodeId,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperData {
    pub id: NodeId,
    pub keyword: Token,
    pub method: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThisData {
    pub id: NodeId,
    pub keyword: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommaData {
    pub exprs: Vec<Expr>,
    pub last: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableData {
    pub id: NodeId,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputData {
    pub keyword: Token,
}

/// An expression is any piece of NEX source that produces a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assign(AssignData),
    Binary(BinaryData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    Super(SuperData),
    This(ThisData),
    Grouping(GroupingData),
    Literal(Literal),
    Logical(LogicalData),
    Unary(UnaryData),
    Comma(CommaData),
    Variable(VariableData),
    Input(InputData),
}

impl Expr {
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Assign(data) => visitor.visit_assign_expr(data),
            Expr::Binary(data) => visitor.visit_binary_expr(data),
            Expr::Call(data) => visitor.visit_call_expr(data),
            Expr::Get(data) => visitor.visit_get_expr(data),
            Expr::Set(data) => visitor.visit_set_expr(data),
            Expr::Super(data) => visitor.visit_super_expr(data),
            Expr::This(data) => visitor.visit_this_expr(data),
            Expr::Grouping(data) => visitor.visit_grouping_expr(data),
            Expr::Literal(data) => visitor.visit_literal_expr(data),
            Expr::Logical(data) => visitor.visit_logical_expr(data),
            Expr::Unary(data) => visitor.visit_unary_expr(data),
            Expr::Comma(data) => visitor.visit_comma_expr(data),
            Expr::Variable(data) => visitor.visit_variable_expr(data),
            Expr::Input(data) => visitor.visit_input_expr(data),
        }
    }

    /// Identity used to key the resolver's locals side table. Only the
    /// node kinds the resolver actually binds (variable reads, `this`,
    /// `super`, assignment targets) carry an id.
    pub fn id(&self) -> Option<NodeId> {
        match self {
            Expr::Variable(data) => Some(data.id),
            Expr::Assign(data) => Some(data.id),
            Expr::This(data) => Some(data.id),
            Expr::Super(data) => Some(data.id),
            _ => None,
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_assign_expr(&mut self, data: &AssignData) -> T;
    fn visit_binary_expr(&mut self, data: &BinaryData) -> T;
    fn visit_call_expr(&mut self, data: &CallData) -> T;
    fn visit_get_expr(&mut self, data: &GetData) -> T;
    fn visit_set_expr(&mut self, data: &SetData) -> T;
    fn visit_super_expr(&mut self, data: &SuperData) -> T;
    fn visit_this_expr(&mut self, data: &ThisData) -> T;
    fn visit_grouping_expr(&mut self, data: &GroupingData) -> T;
    fn visit_literal_expr(&mut self, data: &Literal) -> T;
    fn visit_logical_expr(&mut self, data: &LogicalData) -> T;
    fn visit_unary_expr(&mut self, data: &UnaryData) -> T;
    fn visit_comma_expr(&mut self, data: &CommaData) -> T;
    fn visit_variable_expr(&mut self, data: &VariableData) -> T;
    fn visit_input_expr(&mut self, data: &InputData) -> T;
}
