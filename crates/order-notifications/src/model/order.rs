use crate::intake::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shortest accepted product name, in characters.
pub const MIN_NAME_LEN: usize = 3;

/// One product line of an order.
///
/// Fields are private: the only way to obtain an `OrderLine` is
/// [`OrderLine::new`], so every line in the pipeline has already been
/// validated.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    name: String,
    price: Decimal,
    quantity: u32,
}

impl OrderLine {
    /// Creates a validated order line.
    ///
    /// # Arguments
    /// * `name` - Product name, at least [`MIN_NAME_LEN`] characters
    /// * `price` - Unit price, strictly positive
    /// * `quantity` - Number of units, at least 1
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Result<Self, OrderError> {
        let name = name.into();
        if name.chars().count() < MIN_NAME_LEN {
            return Err(OrderError::NameTooShort(name));
        }
        if price <= Decimal::ZERO {
            return Err(OrderError::InvalidPrice(price));
        }
        if quantity < 1 {
            return Err(OrderError::InvalidQuantity(i64::from(quantity)));
        }
        Ok(Self {
            name,
            price,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A request to place an order: a non-empty, ordered list of lines.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCommand {
    lines: Vec<OrderLine>,
}

impl OrderCommand {
    /// Creates a command from already validated lines. Line order is kept.
    pub fn new(lines: Vec<OrderLine>) -> Result<Self, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }
}

// DTOs for order intake.

/// Unvalidated request body, e.g. `{"products":[{"name":"Widget","price":9.99,"quantity":2}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOrderRequest {
    pub products: Vec<OrderLineDto>,
}

/// Unvalidated product line as received from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineDto {
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

impl TryFrom<OrderLineDto> for OrderLine {
    type Error = OrderError;

    fn try_from(dto: OrderLineDto) -> Result<Self, Self::Error> {
        let quantity =
            u32::try_from(dto.quantity).map_err(|_| OrderError::InvalidQuantity(dto.quantity))?;
        OrderLine::new(dto.name, dto.price, quantity)
    }
}

impl TryFrom<AddOrderRequest> for OrderCommand {
    type Error = OrderError;

    /// Validates every line, reporting the first invalid one by position.
    fn try_from(request: AddOrderRequest) -> Result<Self, Self::Error> {
        let lines = request
            .products
            .into_iter()
            .enumerate()
            .map(|(index, dto)| {
                OrderLine::try_from(dto).map_err(|e| OrderError::InvalidLine {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        OrderCommand::new(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_order_line_validation() {
        assert!(OrderLine::new("Widget", price("9.99"), 2).is_ok());
        assert!(OrderLine::new("Pen", price("0.01"), 1).is_ok());

        assert_eq!(
            OrderLine::new("ab", price("1"), 1),
            Err(OrderError::NameTooShort("ab".into()))
        );
        assert_eq!(
            OrderLine::new("Widget", Decimal::ZERO, 1),
            Err(OrderError::InvalidPrice(Decimal::ZERO))
        );
        assert_eq!(
            OrderLine::new("Widget", price("-5"), 1),
            Err(OrderError::InvalidPrice(price("-5")))
        );
        assert_eq!(
            OrderLine::new("Widget", price("1"), 0),
            Err(OrderError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        // Three characters, six bytes.
        assert!(OrderLine::new("äöü", price("1"), 1).is_ok());
    }

    #[test]
    fn test_empty_command_rejected() {
        assert_eq!(OrderCommand::new(vec![]), Err(OrderError::EmptyOrder));
    }

    #[test]
    fn test_request_conversion_keeps_line_order() {
        let request: AddOrderRequest = serde_json::from_str(
            r#"{"products":[
                {"name":"Widget","price":9.99,"quantity":2},
                {"name":"Gadget","price":"12.50","quantity":1}
            ]}"#,
        )
        .unwrap();

        let command = OrderCommand::try_from(request).unwrap();
        let names: Vec<_> = command.lines().iter().map(OrderLine::name).collect();
        assert_eq!(names, ["Widget", "Gadget"]);
        assert_eq!(command.lines()[0].price(), price("9.99"));
        assert_eq!(command.lines()[1].price(), price("12.50"));
    }

    #[test]
    fn test_request_conversion_reports_failing_line() {
        let request = AddOrderRequest {
            products: vec![
                OrderLineDto {
                    name: "Widget".into(),
                    price: price("1"),
                    quantity: 1,
                },
                OrderLineDto {
                    name: "Gadget".into(),
                    price: price("1"),
                    quantity: -3,
                },
            ],
        };

        match OrderCommand::try_from(request) {
            Err(OrderError::InvalidLine { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(*source, OrderError::InvalidQuantity(-3));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
