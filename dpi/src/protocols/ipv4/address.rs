use crate::parser::ParserError;
use nom::IResult;
use nom::Parser;
use nom::bytes::take;
use std::net::Ipv4Addr;

pub const LENGTH_BYTES: usize = 4;

pub fn parse(input: &[u8]) -> IResult<&[u8], Ipv4Addr> {
    let (input, octets) = take(LENGTH_BYTES).parse(input)?;
    let octets = <[u8; LENGTH_BYTES]>::try_from(octets)
        .map_err(|_| ParserError::ErrorVerify.to_nom(input))?;

    Ok((input, Ipv4Addr::from(octets)))
}
